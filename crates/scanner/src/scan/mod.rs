//! Scan passes and the caller-facing [`Scanner`].
//!
//! A pass runs on one dedicated worker thread. The caller starts it, polls
//! [`Progress`] and the pass state, and collects the results once the worker
//! has finished. The worker accumulates everything locally and publishes it
//! in one step when the pass ends, however it ends.

mod analyse;
mod full;
mod pass;

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use exn::ResultExt;
use sweep_catalog::{CatalogHandle, CatalogStore, Carrier, Location, ScanLocation};
use sweep_config::ScannerConfig;
use sweep_device::DeviceHandle;
use time::UtcDateTime;
use tracing::{info, warn};

use self::pass::Pass;
use crate::error::{Error, ErrorKind, Result};
use crate::merge::{self, ScannedLocation};
use crate::observer::ScanObserver;
use crate::progress::{Counters, Progress};
use crate::protocol::ProtocolRecord;

/// What a pass does with a tuned carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassMode {
    /// Harvest every source of every reachable carrier.
    Scan,
    /// Only resolve which carriers the network tables describe.
    Analyse,
}

/// Lifecycle of the most recent pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassState {
    /// No pass was started yet.
    #[default]
    Idle,
    Running,
    Completed,
    /// Ended early by an observer or by [`Scanner::cancel`].
    Aborted,
    /// Ended by an error; see [`Scanner::error`].
    Faulted,
}
impl PassState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassState::Idle => "idle",
            PassState::Running => "running",
            PassState::Completed => "completed",
            PassState::Aborted => "aborted",
            PassState::Faulted => "faulted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PassState::Completed | PassState::Aborted | PassState::Faulted)
    }
}
impl Display for PassState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Overview of the most recent pass.
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub mode: Option<PassMode>,
    pub state: PassState,
    pub started_at: Option<UtcDateTime>,
    pub finished_at: Option<UtcDateTime>,
    pub progress: Progress,
    pub protocol_records: usize,
    pub unhandled_groups: usize,
    pub excluded_groups: usize,
}

/// Everything a pass produces.
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    pub(crate) mode: Option<PassMode>,
    pub(crate) state: PassState,
    pub(crate) started_at: Option<UtcDateTime>,
    pub(crate) finished_at: Option<UtcDateTime>,
    pub(crate) results: Vec<ScannedLocation>,
    pub(crate) analysis: Vec<ScanLocation>,
    pub(crate) protocol: Vec<ProtocolRecord>,
    pub(crate) unhandled: Vec<Carrier>,
    pub(crate) excluded: Vec<Carrier>,
    pub(crate) error: Option<Arc<Error>>,
    /// The results were already reconciled into a store.
    pub(crate) applied: bool,
}

/// State shared between the caller and one worker. Every pass gets a fresh
/// instance, which is how all accumulators are reset.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) stop: AtomicBool,
    pub(crate) counters: Counters,
    pub(crate) outcome: Mutex<Outcome>,
}
impl Shared {
    fn starting(mode: PassMode) -> Self {
        let outcome = Outcome {
            mode: Some(mode),
            state: PassState::Running,
            started_at: Some(UtcDateTime::now()),
            ..Default::default()
        };
        Self { outcome: Mutex::new(outcome), ..Default::default() }
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub(crate) fn outcome(&self) -> MutexGuard<'_, Outcome> {
        self.outcome.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scans the configured reception locations of a catalog with one device.
///
/// Only one pass runs at a time. Starting a pass stops and joins the
/// previous one first; dropping the scanner does the same.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use sweep_catalog::{CatalogHandle, MemoryCatalog};
/// use sweep_config::ScannerConfig;
/// use sweep_device::DeviceHandle;
/// use sweep_scanner::{PassState, Scanner};
///
/// fn rescan(device: DeviceHandle, catalog: CatalogHandle) -> sweep_scanner::error::Result<()> {
///     let mut scanner = Scanner::new(device, catalog.clone(), ScannerConfig::default());
///     scanner.scan(())?;
///     if scanner.wait() == PassState::Completed {
///         scanner.apply(&*catalog)?;
///     }
///     for record in scanner.protocol() {
///         println!("{record}");
///     }
///     Ok(())
/// }
/// ```
pub struct Scanner {
    device: DeviceHandle,
    catalog: CatalogHandle,
    config: ScannerConfig,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Scanner {
    pub fn new(device: DeviceHandle, catalog: CatalogHandle, config: ScannerConfig) -> Self {
        Self { device, catalog, config, shared: Arc::default(), worker: None }
    }

    /// Starts a full scan: every reachable source is harvested, ready for
    /// [`apply`](Self::apply).
    pub fn scan(&mut self, observer: impl ScanObserver + 'static) -> Result<()> {
        self.start(PassMode::Scan, Box::new(observer))
    }

    /// Starts an analysis: tunes the configured carriers only to learn their
    /// network tables, see [`scan_locations_from_analysis`](Self::scan_locations_from_analysis).
    pub fn analyse(&mut self, observer: impl ScanObserver + 'static) -> Result<()> {
        self.start(PassMode::Analyse, Box::new(observer))
    }

    fn start(&mut self, mode: PassMode, observer: Box<dyn ScanObserver>) -> Result<()> {
        self.cancel();
        self.wait();
        let locations = self.catalog.scan_locations().or_raise(|| ErrorKind::Catalog)?;
        let shared = Arc::new(Shared::starting(mode));
        let pass = Pass::new(self.device.clone(), self.catalog.clone(), &self.config, shared.clone(), observer);
        let worker = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || pass.run(mode, locations))
            .or_raise(|| ErrorKind::Spawn)?;
        info!(?mode, device = self.device.name(), catalog = self.catalog.name(), "scan pass started");
        self.shared = shared;
        self.worker = Some(worker);
        Ok(())
    }

    /// Asks the running pass to stop before its next carrier. Returns
    /// immediately; use [`wait`](Self::wait) to join.
    pub fn cancel(&self) {
        self.shared.stop.store(true, Ordering::Release);
    }

    /// Blocks until the worker has finished and returns the final state.
    pub fn wait(&mut self) -> PassState {
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!("scan worker terminated abnormally");
        }
        self.state()
    }

    pub fn is_done(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    pub fn was_aborted(&self) -> bool {
        self.state() == PassState::Aborted
    }

    pub fn state(&self) -> PassState {
        self.shared.outcome().state
    }

    /// The error that ended the last pass, if it faulted.
    pub fn error(&self) -> Option<Arc<Error>> {
        self.shared.outcome().error.clone()
    }

    pub fn progress(&self) -> Progress {
        self.shared.counters.snapshot()
    }

    /// One location per configured scan location, holding every group that
    /// was tuned and the sources harvested from it.
    pub fn scan_results(&self) -> Vec<Location> {
        self.shared.outcome().results.iter().map(|s| s.location.clone()).collect()
    }

    /// The cleaned scan configuration produced by [`analyse`](Self::analyse).
    pub fn scan_locations_from_analysis(&self) -> Vec<ScanLocation> {
        self.shared.outcome().analysis.clone()
    }

    pub fn protocol(&self) -> Vec<ProtocolRecord> {
        self.shared.outcome().protocol.clone()
    }

    /// Carriers skipped because the catalog or the device cannot handle them.
    pub fn unhandled_groups(&self) -> Vec<Carrier> {
        self.shared.outcome().unhandled.clone()
    }

    /// Carriers skipped by a group filter.
    pub fn excluded_groups(&self) -> Vec<Carrier> {
        self.shared.outcome().excluded.clone()
    }

    pub fn summary(&self) -> PassSummary {
        let outcome = self.shared.outcome();
        PassSummary {
            mode: outcome.mode,
            state: outcome.state,
            started_at: outcome.started_at,
            finished_at: outcome.finished_at,
            progress: self.shared.counters.snapshot(),
            protocol_records: outcome.protocol.len(),
            unhandled_groups: outcome.unhandled.len(),
            excluded_groups: outcome.excluded.len(),
        }
    }

    /// Reconciles the results of the last full scan with the catalog in
    /// `store` and replaces it. The reconciliation records are appended to
    /// [`protocol`](Self::protocol) and [`scan_results`](Self::scan_results)
    /// then holds the merged locations, carried-over sources included.
    ///
    /// A pass can be applied once.
    pub fn apply(&self, store: &dyn CatalogStore) -> Result<()> {
        if !self.is_done() {
            exn::bail!(ErrorKind::Running);
        }
        let mut outcome = self.shared.outcome();
        if outcome.mode != Some(PassMode::Scan) || !outcome.state.is_terminal() || outcome.applied {
            exn::bail!(ErrorKind::NoScanResults);
        }
        let previous = store.locations().or_raise(|| ErrorKind::Catalog)?;
        let reconciliation = merge::reconcile(&previous, &outcome.results);
        let records = reconciliation.protocol.len();
        store.replace_locations(reconciliation.locations.clone()).or_raise(|| ErrorKind::Catalog)?;
        for (scanned, merged) in outcome.results.iter_mut().zip(reconciliation.locations) {
            scanned.location = merged;
        }
        outcome.protocol.extend(reconciliation.protocol);
        outcome.applied = true;
        info!(store = store.name(), records, "scan results applied");
        Ok(())
    }
}
impl Drop for Scanner {
    fn drop(&mut self) {
        self.cancel();
        self.wait();
    }
}
