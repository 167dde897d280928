//! Error types for the hybrid analyst

use thiserror::Error;

/// Result type alias for analyst operations
pub type Result<T> = std::result::Result<T, AnalystError>;

#[derive(Error, Debug)]
pub enum AnalystError {

    // =============================
    // Branch / Pipeline Errors
    // =============================

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Analysis error: {0}")]
    AnalysisError(String),

    /// A branch failed; the whole analysis is aborted with this as its cause.
    #[error("Analysis failed in {branch} branch: {source}")]
    BranchFailed {
        branch: &'static str,
        #[source]
        source: Box<AnalystError>,
    },

    // =============================
    // Recoverable Service Errors
    // =============================

    /// Reasoning service absent, failing or timed out. Always recovered by a fallback.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Retrieval error: {0}")]
    RetrievalError(String),

    // =============================
    // Setup Errors
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnalystError {
    /// Wrap a branch-level cause.
    pub fn branch(branch: &'static str, cause: AnalystError) -> Self {
        AnalystError::BranchFailed {
            branch,
            source: Box::new(cause),
        }
    }

    /// Innermost cause, unwrapping any branch wrappers.
    pub fn root_cause(&self) -> &AnalystError {
        match self {
            AnalystError::BranchFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
