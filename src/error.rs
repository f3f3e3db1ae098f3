// ABOUTME: Application-wide error types for nvcf.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::api::ApiError;
use crate::reconcile::ResourceError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("state file not found: {0}")]
    StateNotFound(PathBuf),

    #[error(
        "missing {attribute} configuration: not found in the {env} environment variable or the provider settings"
    )]
    MissingSetting {
        attribute: &'static str,
        env: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
