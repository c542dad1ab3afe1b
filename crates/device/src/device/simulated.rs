//! Simulated tuner for testing.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sweep_catalog::{Carrier, Equivalence, Origin, SpectrumInversion, Station, Technology};
use tracing::trace;

use super::Device;
use crate::error::{ErrorKind, Result};
use crate::models::{GroupInfo, NetworkTable};

/// One carrier on air, as the simulated device will receive it.
#[derive(Debug, Clone)]
pub struct Broadcast {
    pub origin: Origin,
    /// The true parameters. A cable carrier only locks when tuned with this
    /// inversion, unless it is [`SpectrumInversion::Auto`].
    pub carrier: Carrier,
    pub info: GroupInfo,
    pub network: Option<NetworkTable>,
}
impl Broadcast {
    pub fn new(origin: Origin, carrier: impl Into<Carrier>) -> Self {
        Self { origin, carrier: carrier.into(), info: GroupInfo::default(), network: None }
    }

    pub fn with_stations(mut self, stations: impl IntoIterator<Item = Station>) -> Self {
        self.info.sources.extend(stations);
        self
    }

    pub fn with_network(mut self, network: NetworkTable) -> Self {
        self.network = Some(network);
        self
    }

    fn locks(&self, origin: &Origin, carrier: &Carrier) -> bool {
        if self.origin != *origin || !self.carrier.loosely(carrier) {
            return false;
        }
        match (self.carrier.inversion(), carrier.inversion()) {
            (Some(SpectrumInversion::Auto), _) | (None, _) => true,
            (Some(actual), Some(tuned)) => actual == tuned,
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    on_air: Vec<Broadcast>,
    tuned: Option<usize>,
    tune_log: Vec<Carrier>,
    unsupported: HashSet<Technology>,
    failing: Vec<Carrier>,
    consumer_restriction: bool,
    active_streams: usize,
    prepared: usize,
}

/// Simulated tuner for testing.
///
/// Models a small over-the-air network behind a [`Mutex`], so all trait
/// methods operate on `&self` and the test can reshape the air between
/// passes. Reads never wait; the timeouts are ignored.
///
/// # Examples
///
/// ```
/// use sweep_catalog::{Bandwidth, Origin, SourceId, Station, TerrestrialCarrier};
/// use sweep_device::{Broadcast, Device, SimulatedDevice};
/// use std::time::Duration;
///
/// let carrier = TerrestrialCarrier::new(514000, Bandwidth::Eight);
/// let device = SimulatedDevice::default().with_broadcast(
///     Broadcast::new(Origin::Terrestrial, carrier.clone()).with_stations([Station::new(SourceId::new(1, 1, 1), "Das Erste")]),
/// );
/// device.select_group(&Origin::Terrestrial, &carrier.into()).unwrap();
/// let info = device.group_info(Duration::from_secs(5)).unwrap().unwrap();
/// assert_eq!(info.sources.len(), 1);
/// ```
#[derive(Debug)]
pub struct SimulatedDevice {
    name: String,
    state: Mutex<State>,
}

impl SimulatedDevice {
    /// Change the name of the simulated device.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_broadcast(self, broadcast: Broadcast) -> Self {
        self.state().on_air.push(broadcast);
        self
    }

    /// Refuse carriers of this technology in [`Device::can_handle`].
    pub fn with_unsupported(self, technology: Technology) -> Self {
        self.state().unsupported.insert(technology);
        self
    }

    /// Fail with [`ErrorKind::Tune`] whenever a carrier loosely matching
    /// `carrier` is selected.
    pub fn with_failure(self, carrier: impl Into<Carrier>) -> Self {
        self.state().failing.push(carrier.into());
        self
    }

    pub fn with_consumers(self, restricted: bool, active_streams: usize) -> Self {
        self.set_consumers(restricted, active_streams);
        self
    }

    pub fn set_consumers(&self, restricted: bool, active_streams: usize) {
        let mut state = self.state();
        state.consumer_restriction = restricted;
        state.active_streams = active_streams;
    }

    /// Takes every broadcast loosely matching `carrier` off air.
    pub fn take_off_air(&self, carrier: &Carrier) {
        let mut state = self.state();
        state.on_air.retain(|b| !b.carrier.loosely(carrier));
        state.tuned = None;
    }

    /// Replaces the stations of every broadcast loosely matching `carrier`.
    pub fn set_stations(&self, carrier: &Carrier, stations: Vec<Station>) {
        for broadcast in self.state().on_air.iter_mut().filter(|b| b.carrier.loosely(carrier)) {
            broadcast.info.sources.clone_from(&stations);
        }
    }

    /// Every carrier passed to [`Device::select_group`], in order.
    pub fn tune_log(&self) -> Vec<Carrier> {
        self.state().tune_log.clone()
    }

    pub fn clear_tune_log(&self) {
        self.state().tune_log.clear();
    }

    /// How often [`Device::prepare_source_scan`] was called.
    pub fn prepared(&self) -> usize {
        self.state().prepared
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
impl Default for SimulatedDevice {
    fn default() -> Self {
        Self { name: "simulated".to_string(), state: Mutex::new(State::default()) }
    }
}

impl Device for SimulatedDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_group(&self, origin: &Origin, carrier: &Carrier) -> Result<()> {
        let mut state = self.state();
        state.tune_log.push(carrier.clone());
        state.tuned = None;
        if state.failing.iter().any(|c| c.loosely(carrier)) {
            exn::bail!(ErrorKind::Tune(carrier.to_string()));
        }
        state.tuned = state.on_air.iter().position(|b| b.locks(origin, carrier));
        trace!(%carrier, locked = state.tuned.is_some(), "simulated tune");
        Ok(())
    }

    fn group_info(&self, _timeout: Duration) -> Result<Option<GroupInfo>> {
        let state = self.state();
        Ok(state.tuned.and_then(|index| state.on_air.get(index)).map(|b| b.info.clone()))
    }

    fn location_info(&self, _timeout: Duration) -> Result<Option<NetworkTable>> {
        let state = self.state();
        Ok(state.tuned.and_then(|index| state.on_air.get(index)).and_then(|b| b.network.clone()))
    }

    fn can_handle(&self, carrier: &Carrier) -> bool {
        !self.state().unsupported.contains(&carrier.technology())
    }

    fn prepare_source_scan(&self) -> Result<()> {
        let mut state = self.state();
        if state.consumer_restriction && state.active_streams > 0 {
            exn::bail!(ErrorKind::Busy);
        }
        state.prepared += 1;
        Ok(())
    }

    fn has_consumer_restriction(&self) -> bool {
        self.state().consumer_restriction
    }

    fn active_streams(&self) -> usize {
        self.state().active_streams
    }
}
