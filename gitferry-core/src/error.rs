//! Error types for gitferry

use thiserror::Error;

/// Result type alias for gitferry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for gitferry operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Repository URL that could not be parsed
    #[error("Invalid repository URL: {0}")]
    Url(String),

    /// Git command failure
    #[error("Git error: {0}")]
    Git(String),

    /// Repository hosting control-plane failure
    #[error("Control plane error: {0}")]
    ControlPlane(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
