pub mod device;
pub mod error;
mod models;

pub use crate::device::Device;
#[cfg(feature = "mock")]
pub use crate::device::{Broadcast, SimulatedDevice};
pub use crate::models::{GroupInfo, NetworkTable};
use std::sync::Arc;

pub type DeviceHandle = Arc<dyn Device + Send + Sync>;
