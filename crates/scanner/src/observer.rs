//! Caller hooks invoked by the scan worker.

use sweep_catalog::{Carrier, Origin, ScanLocation, Station};

use crate::progress::Progress;

/// Whether a pass should go on after a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    /// End the pass now; it finishes as aborted, not faulted.
    Abort,
}
impl Flow {
    pub fn is_abort(&self) -> bool {
        matches!(self, Flow::Abort)
    }
}
impl From<bool> for Flow {
    /// `true` means continue.
    fn from(value: bool) -> Self {
        if value { Flow::Continue } else { Flow::Abort }
    }
}

/// Hooks called synchronously from the worker thread, never concurrently.
///
/// Every hook defaults to [`Flow::Continue`]. Returning [`Flow::Abort`]
/// stops the pass before any further hook, tune or harvest.
#[allow(unused_variables)]
pub trait ScanObserver: Send {
    fn location_start(&mut self, location: &ScanLocation, progress: &Progress) -> Flow {
        Flow::Continue
    }

    fn location_done(&mut self, location: &ScanLocation, progress: &Progress) -> Flow {
        Flow::Continue
    }

    fn group_start(&mut self, origin: &Origin, carrier: &Carrier, progress: &Progress) -> Flow {
        Flow::Continue
    }

    fn group_done(&mut self, origin: &Origin, carrier: &Carrier, progress: &Progress) -> Flow {
        Flow::Continue
    }

    fn station_found(&mut self, origin: &Origin, carrier: &Carrier, station: &Station, progress: &Progress) -> Flow {
        Flow::Continue
    }
}

/// Observes nothing and never aborts.
impl ScanObserver for () {}
