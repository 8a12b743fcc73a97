//! Domain error types

use thiserror::Error;

/// Errors that can occur while driving the Tux controller
#[derive(Error, Debug)]
pub enum TuxError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No controller attached")]
    NotAttached,

    #[error("Application state corrupted: {0}")]
    State(String),
}

/// Result type alias for Tux controller operations
pub type TuxResult<T> = Result<T, TuxError>;
