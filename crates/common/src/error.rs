use thiserror::Error;

/// Errors raised while loading configuration or touching local storage
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Helper to create configuration errors
pub fn config_error(message: impl Into<String>) -> Error {
    Error::Config(message.into())
}

/// Helper to create storage errors
pub fn storage_error(message: impl Into<String>) -> Error {
    Error::Storage(message.into())
}
