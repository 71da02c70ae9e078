//! Error types for document comparison

use thiserror::Error;

/// Result type for comparison operations
pub type Result<T> = std::result::Result<T, CompareError>;

/// Which of the two compared documents an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Current,
    Previous,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Current => write!(f, "current"),
            Side::Previous => write!(f, "previous"),
        }
    }
}

/// Comparison errors
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("{side} document is missing its '{section}' section")]
    MissingSection { side: Side, section: &'static str },

    #[error("Rule file parse failed: {0}")]
    RulePolicy(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
