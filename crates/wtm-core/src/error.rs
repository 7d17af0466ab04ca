//! Unified error type for the WTM workspace.
//!
//! Domain-specific error types (such as the optimizer's
//! `MaintenanceError`) can be converted into [`WtmError`] for uniform
//! handling at API boundaries like the CLI.

use thiserror::Error;

/// Unified error type for turbine-analytics operations.
#[derive(Error, Debug)]
pub enum WtmError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Solver/optimization errors
    #[error("Solver error: {0}")]
    Solver(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using WtmError.
pub type WtmResult<T> = Result<T, WtmError>;

impl From<anyhow::Error> for WtmError {
    fn from(err: anyhow::Error) -> Self {
        WtmError::Other(err.to_string())
    }
}

impl From<String> for WtmError {
    fn from(s: String) -> Self {
        WtmError::Other(s)
    }
}

impl From<&str> for WtmError {
    fn from(s: &str) -> Self {
        WtmError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for WtmError {
    fn from(err: serde_json::Error) -> Self {
        WtmError::Parse(err.to_string())
    }
}

impl From<chrono::ParseError> for WtmError {
    fn from(err: chrono::ParseError) -> Self {
        WtmError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_kind() {
        let err = WtmError::Solver("terminated abnormally".into());
        assert!(err.to_string().contains("Solver error"));
        assert!(err.to_string().contains("terminated abnormally"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing fault log");
        let err: WtmError = io_err.into();
        assert!(matches!(err, WtmError::Io(_)));
    }

    #[test]
    fn chrono_parse_error_converts() {
        let parse_err = chrono::NaiveDate::parse_from_str("not-a-date", "%Y-%m-%d").unwrap_err();
        let err: WtmError = parse_err.into();
        assert!(matches!(err, WtmError::Parse(_)));
    }

    #[test]
    fn question_mark_propagates() {
        fn inner() -> WtmResult<()> {
            Err(WtmError::Validation("day maps to two months".into()))
        }

        fn outer() -> WtmResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
