//! The worker side of a pass: context, hooks, the shared tune step and
//! publication of the outcome.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use exn::ResultExt;
use sweep_catalog::{CatalogHandle, Carrier, Origin, ScanLocation, SpectrumInversion, Technology};
use sweep_config::ScannerConfig;
use sweep_device::{DeviceHandle, GroupInfo};
use time::UtcDateTime;
use tracing::{debug, error, info, info_span, instrument, warn};

use super::{Outcome, PassMode, PassState, Shared, analyse, full};
use crate::error::{Error, ErrorKind, Result};
use crate::merge::ScannedLocation;
use crate::observer::{Flow, ScanObserver};
use crate::progress::{Counters, Progress};

/// Result of tuning one carrier.
pub(crate) struct Reception {
    /// The carrier as actually tuned, with its inversion resolved.
    pub(crate) carrier: Carrier,
    /// `None` when the carrier did not lock.
    pub(crate) info: Option<GroupInfo>,
    /// Carriers of the same technology announced by the network table, with
    /// the tuned carrier's corrections applied. `None` when no table was
    /// requested or none arrived.
    pub(crate) siblings: Option<Vec<Carrier>>,
}

pub(crate) struct Pass {
    pub(crate) device: DeviceHandle,
    pub(crate) catalog: CatalogHandle,
    pub(crate) outcome: Outcome,
    shared: Arc<Shared>,
    observer: Box<dyn ScanObserver>,
    group_info_timeout: Duration,
    network_info_timeout: Duration,
    require_idle_device: bool,
    /// Current cable inversion hypothesis; kept across carriers and
    /// locations because it is a property of the head-end.
    inversion: SpectrumInversion,
}

impl Pass {
    pub(crate) fn new(
        device: DeviceHandle,
        catalog: CatalogHandle,
        config: &ScannerConfig,
        shared: Arc<Shared>,
        observer: Box<dyn ScanObserver>,
    ) -> Self {
        Self {
            device,
            catalog,
            outcome: Outcome::default(),
            shared,
            observer,
            group_info_timeout: config.group_info_timeout(),
            network_info_timeout: config.network_info_timeout(),
            require_idle_device: config.require_idle_device,
            inversion: config.initial_inversion,
        }
    }

    /// Worker thread entry point.
    pub(crate) fn run(mut self, mode: PassMode, locations: Vec<ScanLocation>) {
        let span = match mode {
            PassMode::Scan => info_span!("scan", device = self.device.name()),
            PassMode::Analyse => info_span!("analyse", device = self.device.name()),
        };
        let _entered = span.enter();
        self.shared.counters.start_pass(locations.len());

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.drive(mode, &locations)));
        let (state, error) = match result {
            Ok(Ok(Flow::Continue)) => (PassState::Completed, None),
            Ok(Ok(Flow::Abort)) => (PassState::Aborted, None),
            Ok(Err(err)) => {
                error!(error = ?err, "scan pass failed");
                (PassState::Faulted, Some(err))
            },
            Err(payload) => {
                let message = panic_message(&*payload);
                error!(%message, "scan worker panicked");
                (PassState::Faulted, Some(Error::from(ErrorKind::WorkerPanicked(message))))
            },
        };
        info!(%state, "scan pass finished");
        self.publish(state, error);
    }

    fn drive(&mut self, mode: PassMode, locations: &[ScanLocation]) -> Result<Flow> {
        // Seeded before the device checks: a pass faulting there leaves every
        // location unreachable.
        if mode == PassMode::Scan {
            self.outcome.results = locations.iter().map(ScannedLocation::pending).collect();
        }
        if self.require_idle_device && self.device.has_consumer_restriction() {
            let active_streams = self.device.active_streams();
            if active_streams > 0 {
                exn::bail!(ErrorKind::DeviceBusy { active_streams });
            }
        }
        self.device.prepare_source_scan().or_raise(|| ErrorKind::Device)?;
        match mode {
            PassMode::Scan => full::run(self, locations),
            PassMode::Analyse => analyse::run(self, locations),
        }
    }

    fn publish(self, state: PassState, error: Option<Error>) {
        let mut outcome = self.shared.outcome();
        let (mode, started_at) = (outcome.mode, outcome.started_at);
        *outcome = Outcome {
            mode,
            state,
            started_at,
            finished_at: Some(UtcDateTime::now()),
            error: error.map(Arc::new),
            ..self.outcome
        };
    }

    pub(crate) fn counters(&self) -> &Counters {
        &self.shared.counters
    }

    /// External cancellation, checked before every carrier.
    pub(crate) fn stopped(&self) -> bool {
        let stopped = self.shared.stop_requested();
        if stopped {
            info!("scan pass cancelled");
        }
        stopped
    }

    /// Invokes one observer hook with a fresh progress snapshot.
    pub(crate) fn hook(&mut self, name: &'static str, call: impl FnOnce(&mut dyn ScanObserver, &Progress) -> Flow) -> Flow {
        let progress = self.shared.counters.snapshot();
        let flow = call(self.observer.as_mut(), &progress);
        if flow.is_abort() {
            info!(hook = name, "scan pass aborted by observer");
        }
        flow
    }

    /// Neither the catalog nor the device refuse the carrier.
    pub(crate) fn supported(&self, carrier: &Carrier) -> bool {
        self.catalog.supports_group(carrier) && self.device.can_handle(carrier)
    }

    pub(crate) fn excluded(&self, carrier: &Carrier) -> bool {
        self.catalog.group_filter(carrier).is_some_and(|f| f.exclude_from_scan)
    }

    /// Tunes a copy of `carrier` and, if it locked and `discover` is set,
    /// reads the network table.
    #[instrument(level = "debug", skip(self, origin, carrier), fields(%carrier))]
    pub(crate) fn receive(&mut self, origin: &Origin, carrier: &Carrier, discover: bool) -> Result<Reception> {
        let mut carrier = carrier.clone();
        let info = self.tune(origin, &mut carrier)?;
        let siblings = match info {
            Some(_) if discover => self.siblings(&carrier)?,
            _ => None,
        };
        Ok(Reception { carrier, info, siblings })
    }

    /// Cable carriers are tuned with the current inversion hypothesis when
    /// their own is `Auto`; without a lock the hypothesis is flipped and the
    /// carrier tuned once more.
    fn tune(&mut self, origin: &Origin, carrier: &mut Carrier) -> Result<Option<GroupInfo>> {
        if carrier.inversion() == Some(SpectrumInversion::Auto) {
            carrier.set_inversion(self.inversion);
        }
        debug!(%carrier, "tuning");
        let info = self.select(origin, carrier)?;
        if info.is_some() {
            return Ok(info);
        }
        warn!(%origin, %carrier, "no group information");
        if carrier.technology() != Technology::Cable {
            return Ok(None);
        }
        self.inversion = self.inversion.flipped();
        carrier.set_inversion(self.inversion);
        debug!(%carrier, "tuning again with flipped inversion");
        self.select(origin, carrier)
    }

    fn select(&self, origin: &Origin, carrier: &Carrier) -> Result<Option<GroupInfo>> {
        self.device.select_group(origin, carrier).or_raise(|| ErrorKind::Device)?;
        self.device.group_info(self.group_info_timeout).or_raise(|| ErrorKind::Device)
    }

    fn siblings(&self, tuned: &Carrier) -> Result<Option<Vec<Carrier>>> {
        let Some(table) = self.device.location_info(self.network_info_timeout).or_raise(|| ErrorKind::Device)? else {
            return Ok(None);
        };
        debug!(network = ?table.network, name = table.name.as_deref().unwrap_or_default(), "network table received");
        let siblings = table
            .carriers
            .into_iter()
            .filter(|c| c.technology() == tuned.technology())
            .map(|mut sibling| {
                sibling.adopt_corrections(tuned);
                info!(%sibling, "network table announces carrier");
                sibling
            })
            .collect();
        Ok(Some(siblings))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    payload.downcast_ref::<String>().cloned().unwrap_or_else(|| "unknown panic payload".to_string())
}
