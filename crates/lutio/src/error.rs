//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur during LUT operations.
#[derive(Debug, Error)]
pub enum LutError {
    /// The file violates the grammar of its format.
    #[error("parse error: {0}")]
    ParseError(String),

    /// A LUT value violates a structural precondition.
    ///
    /// Raised before writing (wrong rank, explicit domain, size out of
    /// bounds) and when a read produces an inconsistent grid.
    #[error("validation error: {0}")]
    Validation(String),

    /// An Iridas `.cube` read met constructs only the Resolve dialect
    /// understands (shaper + cube in one file, `LUT_*_INPUT_RANGE`).
    #[error("Resolve cube dialect: {0}")]
    ResolveDialect(String),

    /// Unknown file extension or format name.
    #[error("unsupported LUT format: {0}")]
    UnsupportedFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LutError {
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Fails with [`LutError::Validation`] when `condition` does not hold.
pub(crate) fn ensure(condition: bool, msg: &str) -> LutResult<()> {
    if condition {
        Ok(())
    } else {
        Err(LutError::validation(msg))
    }
}
