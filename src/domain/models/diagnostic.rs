//! Opaque error descriptors reported by the model-validation collaborator.

use serde::{Deserialize, Serialize};

/// A detected problem in the model under repair.
///
/// The engine never interprets the problem itself: `code` is the lookup key
/// into the knowledge table and `message` rides along for logging and for
/// preference scoring context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable error code assigned by the collaborator's validator.
    pub code: i32,

    /// Human-readable description of the problem.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
