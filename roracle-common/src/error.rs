//! Common error types for RORacle

use thiserror::Error;

/// Common result type for RORacle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the RORacle crates
#[derive(Error, Debug)]
pub enum Error {
    /// Remote API call failed: non-2xx status, transport failure or undecodable body
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures of the remote API rather than local input or setup
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}
