//! Reconciliation of a scan pass against the previous catalog.
//!
//! Sources are compared by [`SourceId`] only. A previously known source that
//! was not seen again is never dropped: it is carried into the matching new
//! group (loose carrier match), or into a sourceless copy of its old group.
//! It is reported as [`ProtocolMode::NotFound`] only if its old carrier was
//! actually tuned during the pass.

use std::collections::HashSet;

use sweep_catalog::{Carrier, Equivalence, Location, Match, ScanLocation, SourceId, equivalence};
use tracing::{debug, instrument, trace};

use crate::protocol::{ProtocolMode, ProtocolRecord};

/// A location as produced by a full scan pass.
#[derive(Debug, Clone)]
pub struct ScannedLocation {
    pub location: Location,
    /// At least one carrier of the location delivered metadata.
    pub reachable: bool,
    /// Every carrier tuned at this location, locked or not.
    pub visited: Vec<Carrier>,
}
impl ScannedLocation {
    /// Nothing scanned yet.
    pub fn pending(location: &ScanLocation) -> Self {
        Self { location: location.to_location(), reachable: false, visited: Vec::new() }
    }

    fn was_tuned(&self, carrier: &Carrier) -> bool {
        equivalence::contains(&self.visited, carrier, Match::Loose)
    }
}

/// The merged catalog and the records describing how it changed.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub locations: Vec<Location>,
    pub protocol: Vec<ProtocolRecord>,
}

/// Merges freshly scanned locations into the `previous` catalog.
///
/// The result holds exactly one location per scanned location, in scan
/// order; previous locations that were not scanned are not carried over. A
/// scanned location that was unreachable keeps its previous copy untouched
/// and produces no records; so does every previous source whose carrier the
/// pass never tuned, for example because it ended early.
#[instrument(skip_all, fields(previous = previous.len(), scanned = scanned.len()))]
pub fn reconcile(previous: &[Location], scanned: &[ScannedLocation]) -> Reconciliation {
    let mut result = Reconciliation::default();
    for scan in scanned {
        let old = previous.iter().find(|l| l.loosely(&scan.location));
        match old {
            Some(old) if !scan.reachable => {
                debug!(origin = %old.origin, "location unreachable; keeping previous catalog entry");
                result.locations.push(old.clone());
            },
            Some(old) => {
                let merged = merge_location(old, scan, &mut result.protocol);
                if merged.exactly(old) {
                    debug!(origin = %old.origin, "location unchanged");
                }
                result.locations.push(merged);
            },
            None => {
                for group in &scan.location.groups {
                    for source in &group.sources {
                        let record = ProtocolRecord::source(ProtocolMode::Added, &scan.location.origin, &group.carrier, source);
                        result.protocol.push(record);
                    }
                }
                result.locations.push(scan.location.clone());
            },
        }
    }
    result
}

fn merge_location(old: &Location, scan: &ScannedLocation, protocol: &mut Vec<ProtocolRecord>) -> Location {
    let mut current = scan.location.clone();
    let found: HashSet<SourceId> = current.groups.iter().flat_map(|g| g.sources.iter().map(|s| s.id)).collect();
    let mut updated = HashSet::new();
    let mut orphaned = HashSet::new();

    for old_group in &old.groups {
        for old_source in &old_group.sources {
            if found.contains(&old_source.id) {
                updated.insert(old_source.id);
                continue;
            }
            if !orphaned.insert(old_source.id) {
                continue;
            }
            let index = match current.groups.iter().position(|g| g.loosely(old_group)) {
                Some(index) => index,
                None => {
                    current.groups.push(old_group.empty_clone());
                    current.groups.len() - 1
                },
            };
            let group = &mut current.groups[index];
            group.sources.push(old_source.clone());
            if scan.was_tuned(&old_group.carrier) {
                protocol.push(ProtocolRecord::source(ProtocolMode::NotFound, &current.origin, &group.carrier, old_source));
            } else {
                trace!(id = %old_source.id, carrier = %old_group.carrier, "carrier not tuned; source carried over");
            }
        }
    }

    for group in &current.groups {
        for source in group.sources.iter().filter(|s| found.contains(&s.id)) {
            let mode = if updated.contains(&source.id) { ProtocolMode::Found } else { ProtocolMode::Added };
            protocol.push(ProtocolRecord::source(mode, &current.origin, &group.carrier, source));
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweep_catalog::{Bandwidth, Carrier, Group, Origin, Station, TerrestrialCarrier};

    fn carrier(frequency: u32) -> Carrier {
        TerrestrialCarrier::new(frequency, Bandwidth::Eight).into()
    }

    fn station(service: u16, name: &str) -> Station {
        Station::new(SourceId::new(1, 1, service), name)
    }

    fn location(groups: Vec<Group>) -> Location {
        Location { origin: Origin::Terrestrial, groups }
    }

    /// Every carrier in `groups` counts as tuned, plus the `also_tuned` ones.
    fn scanned_with(groups: Vec<Group>, also_tuned: &[u32]) -> ScannedLocation {
        let mut visited: Vec<Carrier> = groups.iter().map(|g| g.carrier.clone()).collect();
        visited.extend(also_tuned.iter().map(|&f| carrier(f)));
        ScannedLocation { location: location(groups), reachable: true, visited }
    }

    fn scanned(groups: Vec<Group>) -> ScannedLocation {
        scanned_with(groups, &[])
    }

    fn records(result: &Reconciliation) -> Vec<(ProtocolMode, u32, u16)> {
        result
            .protocol
            .iter()
            .map(|r| (r.mode, r.carrier.frequency(), r.source.as_ref().map_or(0, |s| s.id.service)))
            .collect()
    }

    #[test]
    fn test_unchanged_catalog_is_all_found() {
        let groups = vec![Group::new(carrier(1)).with_sources([station(1, "A"), station(2, "B")])];
        let result = reconcile(&[location(groups.clone())], &[scanned(groups)]);
        assert_eq!(records(&result), vec![(ProtocolMode::Found, 1, 1), (ProtocolMode::Found, 1, 2)]);
        assert_eq!(result.locations[0].source_count(), 2);
    }

    #[test]
    fn test_scenario_partial_and_unreachable_group() {
        let old = location(vec![
            Group::new(carrier(1)).with_sources([station(1, "A"), station(2, "B")]),
            Group::new(carrier(2)).with_sources([station(3, "C")]),
        ]);
        let new = scanned(vec![Group::new(carrier(1)).with_sources([station(1, "A")]), Group::new(carrier(2))]);
        let result = reconcile(std::slice::from_ref(&old), &[new]);

        assert_eq!(
            records(&result),
            vec![(ProtocolMode::NotFound, 1, 2), (ProtocolMode::NotFound, 2, 3), (ProtocolMode::Found, 1, 1)]
        );
        let merged = &result.locations[0];
        assert_eq!(merged.groups.len(), 2);
        assert!(merged.groups[0].contains(&SourceId::new(1, 1, 2)));
        assert!(merged.groups[1].contains(&SourceId::new(1, 1, 3)));
        // History is cloned, never aliased.
        assert_eq!(old.groups[1].sources.len(), 1);
    }

    #[test]
    fn test_orphan_gets_cloned_group() {
        let old = location(vec![Group::new(carrier(7)).with_sources([station(9, "Gone")])]);
        let scan = scanned_with(vec![Group::new(carrier(1)).with_sources([station(1, "New")])], &[7]);
        let result = reconcile(&[old], &[scan]);
        assert_eq!(records(&result), vec![(ProtocolMode::NotFound, 7, 9), (ProtocolMode::Added, 1, 1)]);
        let merged = &result.locations[0];
        assert_eq!(merged.groups.len(), 2);
        assert_eq!(merged.groups[1].carrier.frequency(), 7);
    }

    #[test]
    fn test_orphan_reported_once() {
        let old = location(vec![
            Group::new(carrier(1)).with_sources([station(5, "Twice")]),
            Group::new(carrier(2)).with_sources([station(5, "Twice")]),
        ]);
        let result = reconcile(&[old], &[scanned_with(vec![], &[1, 2])]);
        assert_eq!(records(&result), vec![(ProtocolMode::NotFound, 1, 5)]);
        assert_eq!(result.locations[0].source_count(), 1);
    }

    #[test]
    fn test_moved_source_is_found() {
        let old = location(vec![Group::new(carrier(1)).with_sources([station(1, "A")])]);
        let result = reconcile(&[old], &[scanned(vec![Group::new(carrier(2)).with_sources([station(1, "A")])])]);
        assert_eq!(records(&result), vec![(ProtocolMode::Found, 2, 1)]);
        assert_eq!(result.locations[0].groups.len(), 1);
    }

    #[test]
    fn test_new_location_is_all_added() {
        let result = reconcile(&[], &[scanned(vec![Group::new(carrier(1)).with_sources([station(1, "A"), station(2, "B")])])]);
        assert_eq!(records(&result), vec![(ProtocolMode::Added, 1, 1), (ProtocolMode::Added, 1, 2)]);
    }

    #[test]
    fn test_unreachable_location_kept_untouched() {
        let old = location(vec![Group::new(carrier(1)).with_sources([station(1, "A")])]);
        let unreachable =
            ScannedLocation { location: location(vec![Group::new(carrier(1))]), reachable: false, visited: vec![carrier(1)] };
        let result = reconcile(&[old], &[unreachable]);
        assert!(result.protocol.is_empty());
        assert_eq!(result.locations[0].source_count(), 1);
    }

    #[test]
    fn test_untuned_group_carried_without_records() {
        let old = location(vec![
            Group::new(carrier(1)).with_sources([station(1, "A")]),
            Group::new(carrier(2)).with_sources([station(2, "B"), station(3, "Moved")]),
        ]);
        // The pass ended after carrier 1; source 3 turned up there.
        let scan = scanned(vec![Group::new(carrier(1)).with_sources([station(1, "A"), station(3, "Moved")])]);
        let result = reconcile(std::slice::from_ref(&old), &[scan]);

        assert_eq!(records(&result), vec![(ProtocolMode::Found, 1, 1), (ProtocolMode::Found, 1, 3)]);
        let merged = &result.locations[0];
        assert_eq!(merged.groups.len(), 2);
        assert_eq!(merged.groups[1].carrier.frequency(), 2);
        assert!(merged.groups[1].contains(&SourceId::new(1, 1, 2)));
        assert!(!merged.groups[1].contains(&SourceId::new(1, 1, 3)));
    }

    #[test]
    fn test_unchanged_location_matches_exactly() {
        let groups = vec![Group::new(carrier(1)).with_sources([station(1, "A")])];
        let old = location(groups.clone());
        let result = reconcile(std::slice::from_ref(&old), &[scanned(groups)]);
        assert!(result.locations[0].exactly(&old));
    }

    #[test]
    fn test_unscanned_previous_location_dropped() {
        let cable = Location::new(Origin::Cable).with_group(Group::new(carrier(1)).with_sources([station(1, "A")]));
        let result = reconcile(&[cable], &[scanned(vec![])]);
        assert_eq!(result.locations.len(), 1);
        assert_eq!(result.locations[0].origin, Origin::Terrestrial);
        assert!(result.protocol.is_empty());
    }
}
