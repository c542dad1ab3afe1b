//! Full scan: visit every carrier of every location and harvest its sources.

use sweep_catalog::{Group, Origin, ScanLocation};
use sweep_device::GroupInfo;
use tracing::{debug, trace};

use super::pass::Pass;
use crate::error::Result;
use crate::observer::Flow;
use crate::protocol::ProtocolRecord;
use crate::queue::WorkQueue;

/// Expects `pass.outcome.results` to hold one pending entry per location.
pub(super) fn run(pass: &mut Pass, locations: &[ScanLocation]) -> Result<Flow> {
    for (index, location) in locations.iter().enumerate() {
        if scan_location(pass, index, location)?.is_abort() {
            return Ok(Flow::Abort);
        }
    }
    Ok(Flow::Continue)
}

fn scan_location(pass: &mut Pass, index: usize, location: &ScanLocation) -> Result<Flow> {
    pass.counters().enter_location();
    if pass.stopped() || pass.hook("location_start", |o, p| o.location_start(location, p)).is_abort() {
        return Ok(Flow::Abort);
    }
    let origin = &location.origin;
    let mut queue = WorkQueue::new(location.carriers.iter().cloned());

    while let Some(carrier) = queue.dequeue_next() {
        pass.counters().set_pending(queue.len());
        pass.counters().next_group();
        if queue.already_done(&carrier) || queue.has_yielded_equivalent(&carrier) {
            trace!(%carrier, "equivalent carrier already visited");
            continue;
        }
        queue.mark_done(&carrier);
        if pass.stopped() {
            return Ok(Flow::Abort);
        }
        if !pass.supported(&carrier) {
            debug!(%carrier, "carrier not supported");
            pass.outcome.unhandled.push(carrier);
            continue;
        }
        if pass.excluded(&carrier) {
            debug!(%carrier, "carrier excluded by filter");
            pass.outcome.excluded.push(carrier);
            continue;
        }
        if pass.hook("group_start", |o, p| o.group_start(origin, &carrier, p)).is_abort() {
            return Ok(Flow::Abort);
        }

        let discover = queue.is_nit_eligible(&carrier);
        let mut visited = carrier;
        if discover || visited.is_complete() {
            let reception = pass.receive(origin, &visited, discover)?;
            queue.mark_done(&reception.carrier);
            // Tuning may have resolved the carrier into a filtered form.
            if pass.excluded(&reception.carrier) {
                debug!(carrier = %reception.carrier, "corrected carrier excluded by filter");
                pass.outcome.excluded.push(reception.carrier);
                continue;
            }
            pass.outcome.results[index].visited.push(reception.carrier.clone());
            if reception.info.is_some() {
                queue.record_metadata(&reception.carrier);
                pass.outcome.results[index].reachable = true;
            }
            for sibling in reception.siblings.into_iter().flatten() {
                queue.insert_discovered(sibling);
            }
            pass.counters().set_pending(queue.len());

            visited = reception.carrier;
            if visited.is_complete() {
                let mut group = Group::new(visited.clone());
                let flow = harvest(pass, origin, &mut group, reception.info);
                pass.outcome.results[index].location.groups.push(group);
                if flow.is_abort() {
                    return Ok(Flow::Abort);
                }
            }
        }

        if pass.hook("group_done", |o, p| o.group_done(origin, &visited, p)).is_abort() {
            return Ok(Flow::Abort);
        }
    }

    if pass.hook("location_done", |o, p| o.location_done(location, p)).is_abort() {
        return Ok(Flow::Abort);
    }
    Ok(Flow::Continue)
}

/// Fills `group` with the sources announced in `info`, after source filters.
fn harvest(pass: &mut Pass, origin: &Origin, group: &mut Group, info: Option<GroupInfo>) -> Flow {
    let Some(info) = info else {
        pass.outcome.protocol.push(ProtocolRecord::empty_group(origin, &group.carrier));
        return Flow::Continue;
    };
    debug!(carrier = %group.carrier, transport_stream = ?info.transport_stream, sources = info.sources.len(), "harvesting");
    for mut station in info.sources {
        if let Some(modifier) = pass.catalog.source_modifier(&station.id) {
            if modifier.exclude_from_scan {
                trace!(id = %station.id, "source excluded by filter");
                continue;
            }
            modifier.apply_to(&mut station);
        }
        if !group.push_unique(station.clone()) {
            continue;
        }
        pass.counters().count_found(station.kind);
        if pass.hook("station_found", |o, p| o.station_found(origin, &group.carrier, &station, p)).is_abort() {
            return Flow::Abort;
        }
    }
    Flow::Continue
}
