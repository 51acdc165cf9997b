//! Error taxonomy for the `include_one` directive

use thiserror::Error;

pub const MSG_EXPANSION_FAILED: &str = "include_one: Failed to expand file patterns";
pub const MSG_NO_MATCH: &str = "include_one: No matching files found";
pub const MSG_ALLOCATION_FAILED: &str = "include_one: Memory allocation failed";

/// Failures that short-circuit a directive invocation.
///
/// `Display` yields the fixed user-facing message for each kind. The
/// underlying cause (when there is one) is kept for logging only.
#[derive(Debug, Error)]
pub enum IncludeError {
    /// Fewer arguments than the directive needs.
    #[error("Invalid {command} command (expected at least {expected} argument, got {got})")]
    Argument { command: &'static str, expected: usize, got: usize },

    /// The pattern string could not be expanded.
    #[error("{}", MSG_EXPANSION_FAILED)]
    Expansion { reason: String },

    /// Expansion succeeded but nothing matched.
    #[error("{}", MSG_NO_MATCH)]
    NoMatch,

    /// Bookkeeping failed while recording an included file.
    #[error("{}", MSG_ALLOCATION_FAILED)]
    Internal { reason: String },
}

impl IncludeError {
    pub fn expansion(reason: impl Into<String>) -> Self {
        Self::Expansion { reason: reason.into() }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal { reason: reason.into() }
    }

    /// Underlying detail, when the kind carries one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Expansion { reason } | Self::Internal { reason } => Some(reason),
            Self::Argument { .. } | Self::NoMatch => None,
        }
    }
}
