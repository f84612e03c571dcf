//! Error types for engine operations

use thiserror::Error;

/// Errors surfaced by the simulation engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Rejected command input; no state was mutated
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the input was rejected
        reason: String,
    },

    /// Addressed entity does not exist at query time
    #[error("Not found: {entity}")]
    NotFound {
        /// Description of the missing entity
        entity: String,
    },

    /// Traffic rotation requested past the last configured scenario
    #[error("No more traffic scenarios ({total} configured)")]
    NoMoreScenarios {
        /// Number of scenarios the engine was built with
        total: usize,
    },

    /// Invariant violation or unexpected state (programming error)
    #[error("Internal engine error: {reason}")]
    Internal {
        /// The violated invariant or unexpected condition
        reason: String,
    },

    /// IO error while reading a traffic file
    #[error("IO error: {source}")]
    Io {
        /// Source IO error
        #[from]
        source: std::io::Error,
    },

    /// JSON error while decoding a traffic file
    #[error("JSON error: {source}")]
    Json {
        /// Source JSON error
        #[from]
        source: serde_json::Error,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidArgument`]
    pub fn invalid(reason: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`EngineError::Internal`]
    pub fn internal(reason: impl Into<String>) -> Self {
        EngineError::Internal {
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
