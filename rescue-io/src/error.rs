//! Error types for RescueIO

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// RescueIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error (sockets, config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Device reported a failure
    #[error("Device error: {0}")]
    Device(String),

    /// Frame could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Relay frame failed validation
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Simulator ran past its step budget (a control loop never terminated)
    #[error("Simulation step budget exhausted after {0} steps")]
    SimulationBudget(u64),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
