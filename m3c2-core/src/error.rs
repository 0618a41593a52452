//! Error types for m3c2

use thiserror::Error;

/// Main error type for m3c2 operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for m3c2 operations
pub type Result<T> = std::result::Result<T, Error>;
