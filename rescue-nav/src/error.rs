//! Error types for RescueNav

use thiserror::Error;

/// RescueNav error type
///
/// Unreachable targets, failed grasps and missing relay readings are normal
/// outcomes and never show up here.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Device error: {0}")]
    Io(#[from] rescue_io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Drive request has neither a target distance nor a stop condition")]
    UnboundedDrive,

    #[error("Cell ({0}, {1}) is outside the arena")]
    InvalidCell(i32, i32),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
