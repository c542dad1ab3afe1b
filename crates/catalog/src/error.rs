//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A canonical text form could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending input.
        value: String,
    },
    /// The backing store failed to load or persist the catalog.
    #[display("catalog store error: {_0}")]
    Store(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Text is either valid or it isn't; store failures depend on the
        // backend and are assumed transient.
        matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        let err = ErrorKind::ParseError { field: "frequency", value: "abc".to_string() };
        assert_eq!(err.to_string(), "failed to parse field 'frequency', found value: abc");
        assert_eq!(ErrorKind::Store("locked".to_string()).to_string(), "catalog store error: locked");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(!ErrorKind::ParseError { field: "x", value: String::new() }.is_retryable());
        assert!(ErrorKind::Store("io".to_string()).is_retryable());
    }
}
