mod consts;
pub mod equivalence;
pub mod error;
pub mod models;
pub mod store;

use std::sync::Arc;

pub use crate::equivalence::{Equivalence, Match};
pub use crate::models::{
    Bandwidth, CableCarrier, CableModulation, Carrier, DiseqcPosition, Group, GroupFilter, InnerFec, Location, Origin,
    Polarization, RollOff, SatelliteCarrier, SatelliteDish, SatelliteModulation, ScanLocation, SourceId, SourceKind,
    SourceModifier, SpectrumInversion, Station, Technology, TerrestrialCarrier,
};
pub use crate::store::{CatalogStore, MemoryCatalog};

pub type CatalogHandle = Arc<dyn CatalogStore + Send + Sync>;
