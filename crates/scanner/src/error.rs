//! Scanner Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Device and catalog failures keep
//! their own frames as children of [`ErrorKind::Device`] and
//! [`ErrorKind::Catalog`].

use derive_more::{Display, Error};

/// A scanner error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a scanner failure.
///
/// ### Dependency Errors
/// - [`ErrorKind::Device`]
/// - [`ErrorKind::Catalog`]
///
/// ### Operational Errors
/// - [`ErrorKind::DeviceBusy`]
/// - [`ErrorKind::Spawn`]
/// - [`ErrorKind::Running`]
/// - [`ErrorKind::NoScanResults`]
/// - [`ErrorKind::WorkerPanicked`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A tuner operation failed.
    #[display("device error")]
    Device,
    /// Reading or writing the catalog store failed.
    #[display("catalog error")]
    Catalog,
    /// The device is delivering streams to other consumers.
    #[display("device is busy with {active_streams} active stream(s)")]
    DeviceBusy {
        #[error(not(source))]
        active_streams: usize,
    },
    /// The worker thread could not be started.
    #[display("failed to spawn scan worker")]
    Spawn,
    /// The operation needs the current pass to have finished.
    #[display("a scan pass is still running")]
    Running,
    /// There is no completed full scan whose results could be applied.
    #[display("no scan results to apply")]
    NoScanResults,
    /// The worker panicked; the payload message is kept if it was a string.
    #[display("scan worker panicked: {_0}")]
    WorkerPanicked(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Device | Self::DeviceBusy { .. } | Self::Running)
    }
}
