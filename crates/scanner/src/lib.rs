pub mod error;
pub mod merge;
pub mod observer;
pub mod progress;
pub mod protocol;
pub mod queue;
mod scan;

pub use crate::merge::{Reconciliation, ScannedLocation, reconcile};
pub use crate::observer::{Flow, ScanObserver};
pub use crate::progress::Progress;
pub use crate::protocol::{ProtocolMode, ProtocolRecord};
pub use crate::queue::WorkQueue;
pub use crate::scan::{PassMode, PassState, PassSummary, Scanner};
