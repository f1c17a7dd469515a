#![forbid(unsafe_code)]

use cv_core::NavError;
use cv_storage::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("invalid config file {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: ConfigFileError,
    },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("{0}")]
    Read(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] serde_yaml::Error),
}

impl DashboardError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(err) => err.code(),
            Self::Nav(NavError::UnknownPage(_)) => "UNKNOWN_PAGE",
            Self::Config(_) | Self::ConfigFile { .. } => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "ENCODE_ERROR",
        }
    }

    /// HTTP status line for an error surfaced by the API.
    pub fn http_status(&self) -> &'static str {
        match self {
            Self::Store(_) => "503 Service Unavailable",
            Self::Nav(_) => "400 Bad Request",
            Self::Config(_) | Self::ConfigFile { .. } => "503 Service Unavailable",
            Self::Io(_) | Self::Json(_) => "500 Internal Server Error",
        }
    }
}
