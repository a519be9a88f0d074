use thiserror::Error;

/// Errors surfaced by the synchronous API (cache access, configuration,
/// worker spawning). Worker-side failures never appear here; they are
/// converted to outcome values at the worker boundary.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Size cache error: {0}")]
    Cache(String),

    #[error("{0}")]
    Other(String),
}
