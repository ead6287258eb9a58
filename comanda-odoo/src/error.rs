//! Client error types

use thiserror::Error;

/// Odoo client error type
#[derive(Debug, Error)]
pub enum OdooError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a JSON-RPC error object
    #[error("Backend error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Credentials rejected during authenticate
    #[error("Authentication rejected by backend")]
    Unauthorized,

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for Odoo client operations
pub type OdooResult<T> = Result<T, OdooError>;
