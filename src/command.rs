//! Directive outcome values as seen by a command dispatcher

use crate::error::IncludeError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdStatus {
    Success,
    Failure,
}

/// Result of running one directive. Carries a message only on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdResult {
    pub status: CmdStatus,
    pub error: Option<String>,
}

impl CmdResult {
    pub fn success() -> Self {
        Self { status: CmdStatus::Success, error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { status: CmdStatus::Failure, error: Some(message.into()) }
    }

    pub fn is_success(&self) -> bool {
        self.status == CmdStatus::Success
    }
}

impl<T> From<Result<T, IncludeError>> for CmdResult {
    fn from(result: Result<T, IncludeError>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}

impl fmt::Display for CmdResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.error) {
            (CmdStatus::Success, _) => write!(f, "success"),
            (CmdStatus::Failure, Some(msg)) => write!(f, "failure: {msg}"),
            (CmdStatus::Failure, None) => write!(f, "failure"),
        }
    }
}

/// Require at least `expected` arguments for `command`.
pub fn check_args<S>(command: &'static str, args: &[S], expected: usize) -> Result<(), IncludeError> {
    if args.len() < expected {
        return Err(IncludeError::Argument { command, expected, got: args.len() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MSG_NO_MATCH;

    #[test]
    fn test_check_args_rejects_empty() {
        let args: [&str; 0] = [];
        let err = check_args("include_one", &args, 1).unwrap_err();
        assert!(matches!(err, IncludeError::Argument { got: 0, expected: 1, .. }));
    }

    #[test]
    fn test_check_args_accepts_enough() {
        assert!(check_args("include_one", &["a.conf"], 1).is_ok());
        assert!(check_args("include_one", &["a.conf", "b.conf"], 1).is_ok());
    }

    #[test]
    fn test_from_result() {
        let ok: CmdResult = Ok::<(), IncludeError>(()).into();
        assert!(ok.is_success());
        assert!(ok.error.is_none());

        let failed: CmdResult = Err::<(), _>(IncludeError::NoMatch).into();
        assert_eq!(failed.status, CmdStatus::Failure);
        assert_eq!(failed.error.as_deref(), Some(MSG_NO_MATCH));
    }
}
