//! Analysis: tune only the configured carriers and replace them by the form
//! their network tables announce.

use sweep_catalog::{Carrier, Match, ScanLocation, equivalence};
use tracing::debug;

use super::pass::Pass;
use crate::error::Result;
use crate::observer::Flow;

pub(super) fn run(pass: &mut Pass, locations: &[ScanLocation]) -> Result<Flow> {
    for location in locations {
        if analyse_location(pass, location)?.is_abort() {
            return Ok(Flow::Abort);
        }
    }
    Ok(Flow::Continue)
}

fn analyse_location(pass: &mut Pass, location: &ScanLocation) -> Result<Flow> {
    let total = location.carriers.len();
    pass.counters().enter_location();
    pass.counters().start_location(total);
    if pass.stopped() || pass.hook("location_start", |o, p| o.location_start(location, p)).is_abort() {
        return Ok(Flow::Abort);
    }
    let origin = &location.origin;
    let mut announced: Vec<Carrier> = Vec::new();
    let mut with_network: Vec<Carrier> = Vec::new();

    for (position, carrier) in location.carriers.iter().enumerate() {
        pass.counters().set_pending(total - position - 1);
        pass.counters().next_group();
        if equivalence::contains(&announced, carrier, Match::Loose) {
            debug!(%carrier, "carrier already announced by a network table");
            continue;
        }
        if pass.stopped() {
            return Ok(Flow::Abort);
        }
        if !pass.supported(carrier) {
            pass.outcome.unhandled.push(carrier.clone());
            continue;
        }
        if pass.hook("group_start", |o, p| o.group_start(origin, carrier, p)).is_abort() {
            return Ok(Flow::Abort);
        }

        let reception = pass.receive(origin, carrier, true)?;
        if let Some(siblings) = reception.siblings {
            for sibling in siblings {
                if !equivalence::contains(&announced, &sibling, Match::Exact) {
                    announced.push(sibling);
                }
            }
            with_network.push(reception.carrier.clone());
        }

        if pass.hook("group_done", |o, p| o.group_done(origin, &reception.carrier, p)).is_abort() {
            return Ok(Flow::Abort);
        }
    }

    let carriers = with_network
        .into_iter()
        .map(|c| equivalence::find(&announced, &c, Match::Loose).cloned().unwrap_or(c))
        .collect();
    debug!(%origin, before = total, "network carriers resolved");
    pass.outcome.analysis.push(ScanLocation { origin: origin.clone(), carriers });

    if pass.hook("location_done", |o, p| o.location_done(location, p)).is_abort() {
        return Ok(Flow::Abort);
    }
    Ok(Flow::Continue)
}
