//! Domain errors for the mender knowledge engine.

use thiserror::Error;

/// Domain-level errors that can occur in the mender engine.
///
/// Absence of learned data is *not* an error: exploit-mode lookups return
/// `Option::None` instead, since "no learned action yet" is the expected
/// steady state early in training. The variants here cover structural
/// failures the driver must handle explicitly.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("no contexts registered for error code {0}")]
    UnknownErrorCode(i32),

    #[error("context {context_id} for error code {error_code} has no registered actions")]
    EmptyContext { error_code: i32, context_id: i32 },

    #[error("no action {action_id} registered under error {error_code}, context {context_id}")]
    ActionNotFound {
        error_code: i32,
        context_id: i32,
        action_id: i32,
    },

    #[error("invalid preference configuration: {0}")]
    InvalidPreferenceConfiguration(String),

    #[error("knowledge document is corrupt: {0}")]
    Corrupt(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Convenience alias for results carrying a [`DomainError`].
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Corrupt(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Storage(err.to_string())
    }
}
