//! In-memory catalog store.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use super::CatalogStore;
use crate::equivalence::Equivalence;
use crate::error::Result;
use crate::models::{Carrier, GroupFilter, Location, ScanLocation, SourceId, SourceModifier, Technology};

/// In-memory catalog store.
///
/// The scan configuration and filters are fixed at construction; only the
/// catalog itself is mutable, behind a [`RwLock`], so the store can be shared
/// with a running scan. Ideal for tests and for callers that persist the
/// catalog themselves.
#[derive(Debug)]
pub struct MemoryCatalog {
    name: String,
    scan_locations: Vec<ScanLocation>,
    locations: RwLock<Vec<Location>>,
    group_filters: Vec<(Carrier, GroupFilter)>,
    source_modifiers: HashMap<SourceId, SourceModifier>,
    unsupported: HashSet<Technology>,
}

impl MemoryCatalog {
    /// Change the name of the store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add an origin to scan.
    pub fn with_scan_location(mut self, location: ScanLocation) -> Self {
        self.scan_locations.push(location);
        self
    }

    /// Add a location to the initial catalog.
    pub fn with_location(self, location: Location) -> Self {
        self.locations.write().unwrap_or_else(PoisonError::into_inner).push(location);
        self
    }

    /// Attach a filter to every carrier exactly matching `carrier`.
    pub fn with_group_filter(mut self, carrier: impl Into<Carrier>, filter: GroupFilter) -> Self {
        self.group_filters.push((carrier.into(), filter));
        self
    }

    pub fn with_source_modifier(mut self, modifier: SourceModifier) -> Self {
        self.source_modifiers.insert(modifier.id, modifier);
        self
    }

    /// Refuse carriers of this technology.
    pub fn with_unsupported(mut self, technology: Technology) -> Self {
        self.unsupported.insert(technology);
        self
    }
}
impl Default for MemoryCatalog {
    fn default() -> Self {
        Self {
            name: "memory".to_string(),
            scan_locations: Vec::new(),
            locations: RwLock::new(Vec::new()),
            group_filters: Vec::new(),
            source_modifiers: HashMap::new(),
            unsupported: HashSet::new(),
        }
    }
}

impl CatalogStore for MemoryCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn scan_locations(&self) -> Result<Vec<ScanLocation>> {
        Ok(self.scan_locations.clone())
    }

    fn locations(&self) -> Result<Vec<Location>> {
        Ok(self.locations.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn replace_locations(&self, locations: Vec<Location>) -> Result<()> {
        debug!(store = %self.name, count = locations.len(), "replacing catalog");
        *self.locations.write().unwrap_or_else(PoisonError::into_inner) = locations;
        Ok(())
    }

    fn supports_group(&self, carrier: &Carrier) -> bool {
        !self.unsupported.contains(&carrier.technology())
    }

    fn group_filter(&self, carrier: &Carrier) -> Option<GroupFilter> {
        self.group_filters.iter().find(|(c, _)| c.exactly(carrier)).map(|(_, filter)| filter.clone())
    }

    fn source_modifier(&self, id: &SourceId) -> Option<SourceModifier> {
        self.source_modifiers.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bandwidth, CableCarrier, CableModulation, Group, Origin, SpectrumInversion};

    fn cable(frequency: u32) -> CableCarrier {
        CableCarrier::new(frequency, 6900, CableModulation::Qam256).with_bandwidth(Bandwidth::Eight)
    }

    #[test]
    fn test_replace_locations() {
        let store = MemoryCatalog::default().with_location(Location::new(Origin::Cable));
        assert_eq!(store.locations().unwrap().len(), 1);
        store
            .replace_locations(vec![Location::new(Origin::Terrestrial), Location::new(Origin::Cable).with_group(Group::new(cable(346000)))])
            .unwrap();
        let locations = store.locations().unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].origin, Origin::Terrestrial);
    }

    #[test]
    fn test_group_filter_is_exact() {
        let store = MemoryCatalog::default()
            .with_group_filter(cable(346000).with_inversion(SpectrumInversion::On), GroupFilter { exclude_from_scan: true });
        let on: Carrier = cable(346000).with_inversion(SpectrumInversion::On).into();
        let off: Carrier = cable(346000).with_inversion(SpectrumInversion::Off).into();
        assert_eq!(store.group_filter(&on), Some(GroupFilter { exclude_from_scan: true }));
        assert_eq!(store.group_filter(&off), None);
    }

    #[test]
    fn test_supports_and_modifiers() {
        let id = SourceId::new(1, 2, 3);
        let store = MemoryCatalog::default()
            .with_name("test")
            .with_unsupported(Technology::Satellite)
            .with_source_modifier(SourceModifier::new(id).excluded());
        assert_eq!(store.name(), "test");
        assert!(store.supports_group(&cable(346000).into()));
        assert!(!store.supports_group(&crate::models::SatelliteCarrier::default().into()));
        assert!(store.source_modifier(&id).is_some_and(|m| m.exclude_from_scan));
        assert!(store.source_modifier(&SourceId::new(1, 2, 4)).is_none());
    }
}
