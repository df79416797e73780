//! Error types for Vibho

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether the failure is the caller's fault (bad arguments or payload)
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::Json(_) | Error::Csv(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
