use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong submitting one file. The sequencer never sees
/// these directly; they are flattened into a rejected `UploadAttemptResult`.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Invalid filename")]
    InvalidFileName,

    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to build request: {0}")]
    Request(reqwest::Error),

    #[error("Failed to send request: {0}")]
    Transport(reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(StatusCode),

    #[error("Failed to parse upload response: {0}")]
    Decode(reqwest::Error),

    #[error("{0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
