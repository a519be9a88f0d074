use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

fn default_cache_db_path() -> String {
    "userdata/db/folder_sizes.db".to_string()
}

fn default_scanner_stop_timeout_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Where the persistent folder-size cache lives.
    #[serde(default = "default_cache_db_path")]
    pub cache_db_path: String,

    /// Initial state of the hidden-files toggle.
    #[serde(default)]
    pub show_hidden: bool,

    /// How long a superseded scanner gets to acknowledge cancellation
    /// before it is abandoned.
    #[serde(default = "default_scanner_stop_timeout_ms")]
    pub scanner_stop_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_db_path: default_cache_db_path(),
            show_hidden: false,
            scanner_stop_timeout_ms: default_scanner_stop_timeout_ms(),
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
