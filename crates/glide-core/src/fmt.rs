const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count as a human-readable size, two decimals, 1024
/// thresholds. Capped at TB.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2}{}", size, UNITS[unit])
}
