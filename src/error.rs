//! Error types for Page Assist.

use uuid::Uuid;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Match error: {0}")]
    Match(#[from] MatchError),
}

/// Rule definition and channel parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid channel label: {0}")]
    InvalidChannel(String),

    #[error("Rule has no usable trigger keyword")]
    EmptyKeywords,
}

/// Rule store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Rule not found: {id}")]
    NotFound { id: Uuid },

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Matching-time errors.
///
/// Callers of the fail-soft API never see these; `ResponseMatcher::respond`
/// degrades them to "no match".
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Analysis failed: {0}")]
    Analysis(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
