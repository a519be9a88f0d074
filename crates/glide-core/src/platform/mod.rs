#[cfg(target_os = "windows")]
pub mod windows;

use std::fs::Metadata;

/// Whether a directory entry counts as hidden.
///
/// A leading dot marks an entry hidden on every platform; on Windows the
/// hidden file attribute does as well.
pub fn is_hidden(name: &str, metadata: &Metadata) -> bool {
    if name.starts_with('.') {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        windows::has_hidden_attribute(metadata)
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = metadata;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_dot_prefix_is_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, "x").unwrap();
        let meta = fs::metadata(&path).unwrap();

        assert!(is_hidden(".config", &meta));
        assert!(!is_hidden("plain.txt", &meta));
    }
}
