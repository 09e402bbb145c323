//! Error types for the cognee wrapper
//!
//! The taxonomy separates configuration problems (which make the decorated
//! model unusable and always propagate) from per-operation memory failures
//! (which the decorator catches, logs, and degrades to a no-op) and from
//! transport-level failures reaching the backend.

use thiserror::Error;

/// Main error type for the cognee wrapper
#[derive(Error, Debug)]
pub enum CogneeError {
    /// Invalid or incomplete configuration (for example, a hosted backend
    /// without an API key)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Backend detection failed and no safe fallback was available
    #[error("Backend undetermined: {0}")]
    BackendUndetermined(String),

    /// The backend rejected an ingest (`add`) request
    #[error("Ingest failed: {payload}")]
    Ingest {
        /// Raw error payload returned by the backend
        payload: String,
    },

    /// The backend rejected a processing (`cognify`) request
    #[error("Processing failed: {payload}")]
    Process {
        /// Raw error payload returned by the backend
        payload: String,
    },

    /// The backend rejected a query (`search`) request
    #[error("Query failed: {payload}")]
    Query {
        /// Raw error payload returned by the backend
        payload: String,
    },

    /// Network-level failure reaching the backend, including the health probe
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by the wrapped language model
    #[error("Model error: {0}")]
    Model(String),
}

/// Result type alias for wrapper operations
pub type Result<T> = std::result::Result<T, CogneeError>;

impl CogneeError {
    /// Create a new Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new BackendUndetermined error
    pub fn undetermined(message: impl Into<String>) -> Self {
        Self::BackendUndetermined(message.into())
    }

    /// Create a new Model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    /// Check if the error is a configuration issue
    ///
    /// Configuration errors are the only memory-related errors the decorator
    /// ever propagates to its caller.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::BackendUndetermined(_))
    }

    /// Check if the error came from a memory operation
    ///
    /// These errors are caught at the point of use and never reach the
    /// integrator.
    pub fn is_memory_error(&self) -> bool {
        matches!(
            self,
            Self::Ingest { .. } | Self::Process { .. } | Self::Query { .. } | Self::Transport(_)
        )
    }
}
