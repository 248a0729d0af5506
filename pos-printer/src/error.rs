//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// No installed device matches the configured printer name
    #[error("Printer not found: {0}")]
    DeviceNotFound(String),

    /// The spooler rejected or failed the job
    #[error("Spool failure: {0}")]
    Spool(String),

    /// The print command could not run or exited with a non-zero code
    #[error("Print command failed: {0}")]
    Process(String),

    /// Temporary or output file could not be written
    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// Timeout waiting for the device
    #[error("Timeout: {0}")]
    Timeout(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
