use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use exn::{OptionExt, ResultExt};

use super::{Carrier, DiseqcPosition, SourceId, Station, Technology};
use crate::{
    consts,
    equivalence::{Equivalence, Match},
    error::{Error, ErrorKind},
};

/// Dish and LNB configuration selecting one satellite position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SatelliteDish {
    pub lnb: DiseqcPosition,
    /// Local oscillator frequency for the low band, in kHz.
    pub lof1: u32,
    /// Local oscillator frequency for the high band, in kHz.
    pub lof2: u32,
    pub switch_frequency: u32,
    /// Whether the LNB is powered by the receiver.
    pub power: bool,
}
impl Default for SatelliteDish {
    fn default() -> Self {
        Self { lnb: DiseqcPosition::None, lof1: 9750000, lof2: 10600000, switch_frequency: 11700000, power: true }
    }
}
impl SatelliteDish {
    pub fn new(lnb: DiseqcPosition) -> Self {
        Self { lnb, ..Default::default() }
    }
}
impl Display for SatelliteDish {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}({}, {}, {}, {})",
            self.lnb,
            self.lof1,
            self.lof2,
            self.switch_frequency,
            if self.power { "True" } else { "False" }
        )
    }
}
impl FromStr for SatelliteDish {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ErrorKind::ParseError { field: "satellite_dish", value: s.to_string() };
        let captures = consts::DISH_REGEX.captures(s.trim()).ok_or_raise(invalid)?;
        let field = |index: usize| captures.get(index).map_or("", |m| m.as_str().trim());
        let frequency = |index: usize| field(index).parse::<u32>().or_raise(invalid);
        let power = match field(5).to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => exn::bail!(invalid()),
        };
        Ok(Self {
            lnb: field(1).parse()?,
            lof1: frequency(2)?,
            lof2: frequency(3)?,
            switch_frequency: frequency(4)?,
            power,
        })
    }
}

/// Where a set of carriers is received from.
///
/// Cable and terrestrial reception have a single implicit origin; satellite
/// origins are told apart by their dish configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Origin {
    Satellite(SatelliteDish),
    Cable,
    Terrestrial,
}
impl Origin {
    pub fn technology(&self) -> Technology {
        match self {
            Origin::Satellite(_) => Technology::Satellite,
            Origin::Cable => Technology::Cable,
            Origin::Terrestrial => Technology::Terrestrial,
        }
    }
}
impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Origin::Satellite(dish) => dish.fmt(f),
            Origin::Cable => f.write_str(Technology::Cable.as_str()),
            Origin::Terrestrial => f.write_str(Technology::Terrestrial.as_str()),
        }
    }
}
impl FromStr for Origin {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "DVB-C" => Origin::Cable,
            "DVB-T" => Origin::Terrestrial,
            dish => Origin::Satellite(dish.parse()?),
        })
    }
}

/// A carrier together with the sources found on it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub carrier: Carrier,
    pub sources: Vec<Station>,
}
impl Group {
    pub fn new(carrier: impl Into<Carrier>) -> Self {
        Self { carrier: carrier.into(), sources: Vec::new() }
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = Station>) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn contains(&self, id: &SourceId) -> bool {
        self.sources.iter().any(|s| s.id == *id)
    }

    /// Appends `station` unless a source with the same id is already listed.
    /// Returns `true` if it was added.
    pub fn push_unique(&mut self, station: Station) -> bool {
        if self.contains(&station.id) {
            return false;
        }
        self.sources.push(station);
        true
    }

    /// A copy of this group's carrier without any sources.
    pub fn empty_clone(&self) -> Self {
        Self::new(self.carrier.clone())
    }
}
impl Equivalence for Group {
    fn matches(&self, other: &Self, mode: Match) -> bool {
        self.carrier.matches(&other.carrier, mode)
    }
}

/// A reception origin and the groups found there.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub origin: Origin,
    pub groups: Vec<Group>,
}
impl Location {
    pub fn new(origin: Origin) -> Self {
        Self { origin, groups: Vec::new() }
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Same origin, no groups.
    pub fn empty_clone(&self) -> Self {
        Self::new(self.origin.clone())
    }

    pub fn source_count(&self) -> usize {
        self.groups.iter().map(|g| g.sources.len()).sum()
    }

    /// Converts the catalog entry back into the configuration needed to scan it.
    pub fn to_scan_location(&self) -> ScanLocation {
        ScanLocation {
            origin: self.origin.clone(),
            carriers: self.groups.iter().map(|g| g.carrier.clone()).collect(),
        }
    }
}
impl Equivalence for Location {
    /// Locations are identified by origin. Exact matching also requires the
    /// same groups carrying the same source ids, in order.
    fn matches(&self, other: &Self, mode: Match) -> bool {
        if self.origin != other.origin {
            return false;
        }
        match mode {
            Match::Loose => true,
            Match::Exact => {
                self.groups.len() == other.groups.len()
                    && self.groups.iter().zip(&other.groups).all(|(a, b)| {
                        a.exactly(b)
                            && a.sources.len() == b.sources.len()
                            && a.sources.iter().zip(&b.sources).all(|(x, y)| x.same_source(y))
                    })
            },
        }
    }
}

/// The static scan configuration of one origin: the carriers to start from.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanLocation {
    pub origin: Origin,
    pub carriers: Vec<Carrier>,
}
impl ScanLocation {
    pub fn new(origin: Origin) -> Self {
        Self { origin, carriers: Vec::new() }
    }

    pub fn with_carrier(mut self, carrier: impl Into<Carrier>) -> Self {
        self.carriers.push(carrier.into());
        self
    }

    /// Technology of the first carrier, which decides the whole location.
    pub fn technology(&self) -> Option<Technology> {
        self.carriers.first().map(Carrier::technology)
    }

    /// An empty catalog entry for the same origin.
    pub fn to_location(&self) -> Location {
        Location::new(self.origin.clone())
    }
}
