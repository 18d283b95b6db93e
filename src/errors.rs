//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the search-history engine, providing
//! structured error types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from the backend client, config loader,
//!   dispatcher and API layer
//! - **Output**: Structured error types with context
//! - **Error Categories**: Configuration, Backend, Dispatch, Api, Generic
//!
//! ## Key Features
//! - Hierarchical error types with detailed context
//! - Automatic error conversion and chaining
//! - User-friendly error messages for API responses
//! - Structured logging integration
//!
//! Matching itself never errors: a malformed date fragment or a superseded
//! remote response degrades to "no additional matches" rather than
//! surfacing here.

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, EngineError>;

/// Error types for the search-history engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    // Backend client errors
    #[error("Backend returned status {status} for {endpoint}")]
    BackendStatus { endpoint: String, status: u16 },

    #[error("Record {record_id} not found in history")]
    RecordNotFound { record_id: crate::RecordId },

    // Remote match errors
    #[error("Remote match failed for query '{query}': {details}")]
    RemoteMatchFailed { query: String, details: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Check if the error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::Http(_)
                | EngineError::BackendStatus { .. }
                | EngineError::RemoteMatchFailed { .. }
        )
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::Config { .. } | EngineError::Toml(_) => "configuration",
            EngineError::Http(_)
            | EngineError::BackendStatus { .. }
            | EngineError::RecordNotFound { .. } => "backend",
            EngineError::RemoteMatchFailed { .. } => "dispatch",
            EngineError::Json(_) => "serialization",
            EngineError::Io(_)
            | EngineError::Internal { .. }
            | EngineError::ValidationFailed { .. } => "generic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_cover_main_variants() {
        let err = EngineError::Config {
            message: "bad".into(),
        };
        assert_eq!(err.category(), "configuration");

        let err = EngineError::RemoteMatchFailed {
            query: "silva".into(),
            details: "timeout".into(),
        };
        assert_eq!(err.category(), "dispatch");
        assert!(err.is_recoverable());

        let err = EngineError::ValidationFailed {
            field: "server.port".into(),
            reason: "zero".into(),
        };
        assert!(!err.is_recoverable());
    }
}
