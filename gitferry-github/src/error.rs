//! Error types for GitHub control-plane operations

use thiserror::Error;

/// Result type for GitHub control-plane operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the gh CLI
#[derive(Error, Debug)]
pub enum Error {
    /// gh executable could not be spawned
    #[error("Failed to run gh: {0}")]
    Spawn(String),

    /// GitHub authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// gh command exited with a failure
    #[error("gh {command} failed for {repo}: {message}")]
    Command {
        /// Subcommand that failed (e.g., "repo create")
        command: String,
        /// owner/repo slug the command targeted
        repo: String,
        /// gh's stderr text
        message: String,
    },

    /// gh produced output that could not be interpreted
    #[error("Unexpected gh output: {0}")]
    Output(String),
}
