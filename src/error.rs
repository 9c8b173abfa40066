use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] junctionforge_core::Error),
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings file {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
