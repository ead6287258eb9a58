//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Printer is offline or unreachable
    #[error("Printer offline: {0}")]
    Offline(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// No printer target could be resolved (no explicit name, no default)
    #[error("No printer available: {0}")]
    NoPrinter(String),

    /// Windows spooler error
    #[cfg(windows)]
    #[error("Spooler error: {0}")]
    Spooler(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
