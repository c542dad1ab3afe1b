//! Tuner device trait and implementations.
//!
//! A [`Device`] is the scanner's only window onto the air: it tunes to one
//! carrier at a time and then reads the tables broadcast on it. Everything
//! is blocking; bounded waits are expressed as timeouts on the read calls.

#[cfg(feature = "mock")]
mod simulated;

#[cfg(feature = "mock")]
pub use self::simulated::{Broadcast, SimulatedDevice};
use crate::error::Result;
use crate::models::{GroupInfo, NetworkTable};
use std::time::Duration;
use sweep_catalog::{Carrier, Origin};

/// Unified interface for tuner devices.
///
/// All methods take `&self`; a device is shared between the caller (who may
/// query its consumer state) and the scan worker.
///
/// # Locking
/// [`select_group`](Device::select_group) only fails when the hardware
/// refuses the request. Whether the carrier actually locked shows up as
/// `None` from [`group_info`](Device::group_info).
pub trait Device {
    /// Human readable name of the device, used in logs.
    fn name(&self) -> &str;

    /// Tunes to `carrier` as received from `origin`.
    fn select_group(&self, origin: &Origin, carrier: &Carrier) -> Result<()>;

    /// Waits up to `timeout` for the metadata of the currently tuned carrier.
    /// `None` means no lock or no tables.
    fn group_info(&self, timeout: Duration) -> Result<Option<GroupInfo>>;

    /// Waits up to `timeout` for the network information table of the
    /// currently tuned carrier.
    fn location_info(&self, timeout: Duration) -> Result<Option<NetworkTable>>;

    /// Whether this device can tune carriers of this kind.
    fn can_handle(&self, carrier: &Carrier) -> bool;

    /// Puts the device into a state suitable for a source scan.
    fn prepare_source_scan(&self) -> Result<()>;

    /// Whether other consumers must be considered before retuning.
    fn has_consumer_restriction(&self) -> bool;

    /// Number of streams currently delivered to consumers.
    fn active_streams(&self) -> usize;
}
