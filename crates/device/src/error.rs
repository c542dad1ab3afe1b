//! Device Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A device error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// A missing lock is not an error: tuning succeeds and the subsequent
/// metadata read reports nothing.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The tuner rejected or failed to apply the requested parameters.
    #[display("tune failed: {_0}")]
    Tune(#[error(not(source))] String),
    /// Reading tables from the transport stream failed.
    #[display("read failed: {_0}")]
    Read(#[error(not(source))] String),
    /// The device is in use by another consumer.
    #[display("device is busy")]
    Busy,
    /// The device or its driver is unusable.
    #[display("hardware error: {_0}")]
    Hardware(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Tune(_) | Self::Read(_) | Self::Busy)
    }
}
