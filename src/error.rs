//! Error types for isamstore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using IsamError
pub type Result<T> = std::result::Result<T, IsamError>;

/// Unified error type for isamstore operations
#[derive(Debug, Error)]
pub enum IsamError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Store Errors
    // -------------------------------------------------------------------------
    #[error("Record with key '{0}' already exists")]
    DuplicateKey(String),

    #[error("Record with key '{0}' not found")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for IsamError {
    fn from(err: bincode::Error) -> Self {
        IsamError::Serialization(err.to_string())
    }
}
