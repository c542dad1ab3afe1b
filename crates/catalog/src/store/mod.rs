//! Catalog store trait and implementations.
//!
//! A [`CatalogStore`] is the scanner's view of the persisted reception
//! catalog: which origins to scan and from which carriers, which carriers and
//! sources are filtered, and the catalog itself, which a completed pass
//! replaces wholesale.

mod memory;

pub use self::memory::MemoryCatalog;
use crate::error::Result;
use crate::models::{Carrier, GroupFilter, Location, ScanLocation, SourceId, SourceModifier};

/// Unified interface for catalog backends.
///
/// All methods take `&self`; implementations synchronise internally so a
/// handle can be shared between the caller and a running scan.
///
/// # Examples
///
/// ```
/// use sweep_catalog::{CatalogStore, MemoryCatalog, Origin, ScanLocation, TerrestrialCarrier, Bandwidth};
///
/// let catalog = MemoryCatalog::default()
///     .with_scan_location(ScanLocation::new(Origin::Terrestrial).with_carrier(TerrestrialCarrier::new(514000, Bandwidth::Eight)));
/// assert_eq!(catalog.scan_locations().unwrap().len(), 1);
/// assert!(catalog.locations().unwrap().is_empty());
/// ```
pub trait CatalogStore {
    /// Human readable name of the store, used in logs.
    fn name(&self) -> &str;

    /// The statically configured origins and carriers to scan.
    fn scan_locations(&self) -> Result<Vec<ScanLocation>>;

    /// The current catalog.
    fn locations(&self) -> Result<Vec<Location>>;

    /// Replaces the whole catalog.
    fn replace_locations(&self, locations: Vec<Location>) -> Result<()>;

    /// Whether the catalog can hold carriers of this kind at all.
    fn supports_group(&self, carrier: &Carrier) -> bool;

    /// The filter configured for exactly this carrier, if any.
    fn group_filter(&self, carrier: &Carrier) -> Option<GroupFilter>;

    /// The modifier configured for this source, if any.
    fn source_modifier(&self, id: &SourceId) -> Option<SourceModifier>;
}
