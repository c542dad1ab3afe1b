use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use super::{
    Bandwidth, CableModulation, InnerFec, Polarization, RollOff, SatelliteModulation, SpectrumInversion, number, part,
};
use crate::{
    consts,
    equivalence::{Equivalence, Match},
    error::{Error, ErrorKind},
};

/// Satellite frequencies within this distance (kHz) are the same transponder.
const SATELLITE_TOLERANCE_KHZ: u32 = 5000;

/// Transmission technology of a carrier or origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Technology {
    Satellite,
    Cable,
    Terrestrial,
}
impl Technology {
    /// Returns the prefix used by the canonical text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::Satellite => "DVB-S",
            Technology::Cable => "DVB-C",
            Technology::Terrestrial => "DVB-T",
        }
    }
}
impl Display for Technology {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A DVB-C carrier. Frequencies are in kHz, symbol rates in symbols/s / 1000.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CableCarrier {
    pub frequency: u32,
    pub symbol_rate: u32,
    pub bandwidth: Bandwidth,
    pub modulation: CableModulation,
    pub inversion: SpectrumInversion,
}
impl CableCarrier {
    pub fn new(frequency: u32, symbol_rate: u32, modulation: CableModulation) -> Self {
        Self { frequency, symbol_rate, modulation, ..Default::default() }
    }

    pub fn with_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn with_inversion(mut self, inversion: SpectrumInversion) -> Self {
        self.inversion = inversion;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.frequency != 0
            && self.symbol_rate != 0
            && self.bandwidth != Bandwidth::NotDefined
            && self.modulation != CableModulation::NotDefined
    }
}
impl Equivalence for CableCarrier {
    fn matches(&self, other: &Self, mode: Match) -> bool {
        if self.frequency != other.frequency {
            return false;
        }
        match mode {
            Match::Loose => true,
            Match::Exact => {
                self.modulation == other.modulation
                    && self.symbol_rate == other.symbol_rate
                    && self.bandwidth == other.bandwidth
                    && self.inversion == other.inversion
            },
        }
    }
}
impl Display for CableCarrier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "DVB-C,{},{},{},{},{}",
            self.frequency, self.inversion, self.bandwidth, self.symbol_rate, self.modulation
        )
    }
}
impl FromStr for CableCarrier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 6 || part(&parts, 0) != "DVB-C" {
            exn::bail!(ErrorKind::ParseError { field: "cable_carrier", value: s.to_string() });
        }
        Ok(Self {
            frequency: number(&parts, 1, "frequency")?,
            inversion: part(&parts, 2).parse()?,
            bandwidth: part(&parts, 3).parse()?,
            symbol_rate: number(&parts, 4, "symbol_rate")?,
            modulation: part(&parts, 5).parse()?,
        })
    }
}

/// A DVB-T carrier.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrestrialCarrier {
    pub frequency: u32,
    pub bandwidth: Bandwidth,
}
impl TerrestrialCarrier {
    pub fn new(frequency: u32, bandwidth: Bandwidth) -> Self {
        Self { frequency, bandwidth }
    }

    pub fn is_complete(&self) -> bool {
        self.frequency != 0 && self.bandwidth != Bandwidth::NotDefined
    }
}
impl Equivalence for TerrestrialCarrier {
    fn matches(&self, other: &Self, mode: Match) -> bool {
        self.frequency == other.frequency && (mode == Match::Loose || self.bandwidth == other.bandwidth)
    }
}
impl Display for TerrestrialCarrier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "DVB-T,{},{}", self.frequency, self.bandwidth)
    }
}
impl FromStr for TerrestrialCarrier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 || part(&parts, 0) != "DVB-T" {
            exn::bail!(ErrorKind::ParseError { field: "terrestrial_carrier", value: s.to_string() });
        }
        Ok(Self { frequency: number(&parts, 1, "frequency")?, bandwidth: part(&parts, 2).parse()? })
    }
}

/// A DVB-S or DVB-S2 transponder.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SatelliteCarrier {
    pub frequency: u32,
    pub symbol_rate: u32,
    pub polarization: Polarization,
    pub fec: InnerFec,
    pub s2: bool,
    pub modulation: SatelliteModulation,
    pub roll_off: RollOff,
    /// Four digit orbital position in tenths of a degree, e.g. `0192`.
    pub orbital_position: Option<String>,
    pub west: bool,
}
impl SatelliteCarrier {
    pub fn new(frequency: u32, symbol_rate: u32, polarization: Polarization) -> Self {
        Self { frequency, symbol_rate, polarization, ..Default::default() }
    }

    pub fn with_fec(mut self, fec: InnerFec) -> Self {
        self.fec = fec;
        self
    }

    pub fn with_modulation(mut self, modulation: SatelliteModulation) -> Self {
        self.modulation = modulation;
        self
    }

    pub fn with_s2(mut self, roll_off: RollOff) -> Self {
        self.s2 = true;
        self.roll_off = roll_off;
        self
    }

    pub fn with_orbital_position(mut self, position: impl Into<String>, west: bool) -> Self {
        self.orbital_position = Some(position.into());
        self.west = west;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.frequency != 0
            && self.symbol_rate != 0
            && self.polarization != Polarization::NotDefined
            && self.modulation != SatelliteModulation::NotDefined
            && self.fec != InnerFec::NotDefined
            && (!self.s2 || self.roll_off != RollOff::NotDefined)
    }

    /// Human readable orbital position, e.g. `19.2°E`.
    pub fn orbital_label(&self) -> String {
        let position = self.orbital_position.as_deref().unwrap_or("");
        let hemisphere = if self.west { "W" } else { "E" };
        match position.len() {
            4 if position.is_ascii() => {
                let degrees = position[..3].trim_start_matches('0');
                format!("{degrees}.{}°{hemisphere}", &position[3..])
            },
            _ => format!("{position}{hemisphere}"),
        }
    }

    fn orbital(&self) -> &str {
        self.orbital_position.as_deref().unwrap_or("")
    }
}
impl Equivalence for SatelliteCarrier {
    fn matches(&self, other: &Self, mode: Match) -> bool {
        match mode {
            Match::Loose => {
                self.frequency.abs_diff(other.frequency) <= SATELLITE_TOLERANCE_KHZ
                    && self.polarization == other.polarization
                    && self.s2 == other.s2
            },
            Match::Exact => {
                self.frequency == other.frequency
                    && self.polarization == other.polarization
                    && self.west == other.west
                    && self.orbital() == other.orbital()
                    && self.s2 == other.s2
                    && self.symbol_rate == other.symbol_rate
                    && self.modulation == other.modulation
                    && self.roll_off == other.roll_off
                    && self.fec == other.fec
            },
        }
    }
}
impl Display for SatelliteCarrier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "DVB-S{},{},{},{},{},{},{},{}",
            if self.s2 { "2" } else { "" },
            self.orbital_label(),
            self.frequency,
            self.polarization,
            self.symbol_rate,
            self.fec,
            self.modulation,
            self.roll_off
        )
    }
}
impl FromStr for SatelliteCarrier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        let s2 = match (parts.len(), part(&parts, 0)) {
            (8, "DVB-S") => false,
            (8, "DVB-S2") => true,
            _ => exn::bail!(ErrorKind::ParseError { field: "satellite_carrier", value: s.to_string() }),
        };
        let orbital = part(&parts, 1);
        let (position, west) = match (orbital.strip_suffix('W'), orbital.strip_suffix('E')) {
            (Some(position), _) => (position, true),
            (None, Some(position)) => (position, false),
            (None, None) => exn::bail!(ErrorKind::ParseError { field: "orbital_position", value: orbital.to_string() }),
        };
        let position = match consts::ORBITAL_REGEX.captures(position) {
            Some(captures) => {
                let degrees = captures.get(1).map_or("", |m| m.as_str());
                let tenths = captures.get(2).map_or("", |m| m.as_str());
                format!("{degrees:0>3}{tenths}")
            },
            None => position.to_string(),
        };
        Ok(Self {
            frequency: number(&parts, 2, "frequency")?,
            polarization: part(&parts, 3).parse()?,
            symbol_rate: number(&parts, 4, "symbol_rate")?,
            fec: part(&parts, 5).parse()?,
            modulation: part(&parts, 6).parse()?,
            roll_off: part(&parts, 7).parse()?,
            orbital_position: (!position.is_empty()).then_some(position),
            west,
            s2,
        })
    }
}

/// A tunable carrier (transponder / channel) of any technology.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "technology", rename_all = "snake_case"))]
pub enum Carrier {
    Satellite(SatelliteCarrier),
    Cable(CableCarrier),
    Terrestrial(TerrestrialCarrier),
}
impl Carrier {
    pub fn technology(&self) -> Technology {
        match self {
            Carrier::Satellite(_) => Technology::Satellite,
            Carrier::Cable(_) => Technology::Cable,
            Carrier::Terrestrial(_) => Technology::Terrestrial,
        }
    }

    pub fn frequency(&self) -> u32 {
        match self {
            Carrier::Satellite(c) => c.frequency,
            Carrier::Cable(c) => c.frequency,
            Carrier::Terrestrial(c) => c.frequency,
        }
    }

    /// A complete carrier carries every parameter needed to tune it; anything
    /// else is a placeholder that the network table may fill in later.
    pub fn is_complete(&self) -> bool {
        match self {
            Carrier::Satellite(c) => c.is_complete(),
            Carrier::Cable(c) => c.is_complete(),
            Carrier::Terrestrial(c) => c.is_complete(),
        }
    }

    /// Spectral inversion, for cable carriers only.
    pub fn inversion(&self) -> Option<SpectrumInversion> {
        match self {
            Carrier::Cable(c) => Some(c.inversion),
            _ => None,
        }
    }

    /// Sets the spectral inversion of a cable carrier; other technologies
    /// have none and are left alone.
    pub fn set_inversion(&mut self, inversion: SpectrumInversion) {
        if let Carrier::Cable(c) = self {
            c.inversion = inversion;
        }
    }

    /// Copies the fields only known after a successful lock (inversion and
    /// bandwidth for cable) from `tuned` onto this carrier.
    pub fn adopt_corrections(&mut self, tuned: &Carrier) {
        if let (Carrier::Cable(own), Carrier::Cable(tuned)) = (self, tuned) {
            own.inversion = tuned.inversion;
            own.bandwidth = tuned.bandwidth;
        }
    }
}
impl Equivalence for Carrier {
    fn matches(&self, other: &Self, mode: Match) -> bool {
        match (self, other) {
            (Carrier::Satellite(a), Carrier::Satellite(b)) => a.matches(b, mode),
            (Carrier::Cable(a), Carrier::Cable(b)) => a.matches(b, mode),
            (Carrier::Terrestrial(a), Carrier::Terrestrial(b)) => a.matches(b, mode),
            _ => false,
        }
    }
}
impl Display for Carrier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Carrier::Satellite(c) => c.fmt(f),
            Carrier::Cable(c) => c.fmt(f),
            Carrier::Terrestrial(c) => c.fmt(f),
        }
    }
}
impl FromStr for Carrier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let prefix = s.split(',').next().unwrap_or("").trim();
        Ok(match prefix {
            "DVB-S" | "DVB-S2" => Carrier::Satellite(s.parse()?),
            "DVB-C" => Carrier::Cable(s.parse()?),
            "DVB-T" => Carrier::Terrestrial(s.parse()?),
            _ => exn::bail!(ErrorKind::ParseError { field: "carrier", value: s.to_string() }),
        })
    }
}
impl From<CableCarrier> for Carrier {
    fn from(value: CableCarrier) -> Self {
        Carrier::Cable(value)
    }
}
impl From<TerrestrialCarrier> for Carrier {
    fn from(value: TerrestrialCarrier) -> Self {
        Carrier::Terrestrial(value)
    }
}
impl From<SatelliteCarrier> for Carrier {
    fn from(value: SatelliteCarrier) -> Self {
        Carrier::Satellite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cable(frequency: u32) -> CableCarrier {
        CableCarrier::new(frequency, 6900, CableModulation::Qam256).with_bandwidth(Bandwidth::Eight)
    }

    fn astra() -> SatelliteCarrier {
        SatelliteCarrier::new(11836000, 27500, Polarization::Horizontal)
            .with_fec(InnerFec::Conv34)
            .with_modulation(SatelliteModulation::Qpsk)
            .with_orbital_position("0192", false)
    }

    #[test]
    fn test_cable_text_form() {
        let carrier = cable(346000).with_inversion(SpectrumInversion::On);
        assert_eq!(carrier.to_string(), "DVB-C,346000,On,Eight,6900,QAM256");
        let parsed: Carrier = "DVB-C,346000,On,Eight,6900,QAM256".parse().unwrap();
        assert!(parsed.exactly(&carrier.into()));
    }

    #[test]
    fn test_terrestrial_text_form() {
        let carrier = TerrestrialCarrier::new(514000, Bandwidth::Eight);
        assert_eq!(carrier.to_string(), "DVB-T,514000,Eight");
        let parsed: TerrestrialCarrier = " DVB-T, 514000 , Eight".parse().unwrap();
        assert!(parsed.exactly(&carrier));
    }

    #[test]
    fn test_satellite_text_form() {
        let carrier = astra();
        assert_eq!(carrier.orbital_label(), "19.2°E");
        assert_eq!(carrier.to_string(), "DVB-S,19.2°E,11836000,Horizontal,27500,Conv3_4,QPSK,NotDefined");
        let parsed: SatelliteCarrier = carrier.to_string().parse().unwrap();
        assert_eq!(parsed.orbital_position.as_deref(), Some("0192"));
        assert!(parsed.exactly(&carrier));

        let s2: SatelliteCarrier = "DVB-S2,5.0°W,12000000,Vertical,27500,Conv9_10,PSK8,Alpha35".parse().unwrap();
        assert!(s2.s2 && s2.west);
        assert_eq!(s2.orbital_position.as_deref(), Some("0050"));
        assert_eq!(s2.roll_off, RollOff::R35);
    }

    #[rstest]
    #[case("")]
    #[case("DVB-X,1,2")]
    #[case("DVB-C,346000,On,Eight,6900")]
    #[case("DVB-C,abc,On,Eight,6900,QAM256")]
    #[case("DVB-T,514000,Nine")]
    #[case("DVB-S,19.2°N,11836000,Horizontal,27500,Conv3_4,QPSK,NotDefined")]
    fn test_invalid_text_forms(#[case] input: &str) {
        assert!(input.parse::<Carrier>().is_err());
    }

    #[test]
    fn test_cable_equivalence() {
        let on: Carrier = cable(346000).with_inversion(SpectrumInversion::On).into();
        let off: Carrier = cable(346000).with_inversion(SpectrumInversion::Off).into();
        let other: Carrier = cable(354000).into();
        assert!(on.loosely(&off));
        assert!(!on.exactly(&off));
        assert!(on.exactly(&on.clone()));
        assert!(!on.loosely(&other));
    }

    #[rstest]
    #[case(11836000, Polarization::Horizontal, true)]
    #[case(11840999, Polarization::Horizontal, true)]
    #[case(11831000, Polarization::Horizontal, true)]
    #[case(11841001, Polarization::Horizontal, false)]
    #[case(11836000, Polarization::Vertical, false)]
    fn test_satellite_loose_tolerance(#[case] frequency: u32, #[case] polarization: Polarization, #[case] expected: bool) {
        let mut other = astra();
        other.frequency = frequency;
        other.polarization = polarization;
        other.symbol_rate = 22000;
        assert_eq!(astra().loosely(&other), expected);
        assert!(!astra().exactly(&other));
    }

    #[test]
    fn test_satellite_exact_orbital_none_is_empty() {
        let mut a = astra();
        let mut b = astra();
        a.orbital_position = None;
        b.orbital_position = Some(String::new());
        assert!(a.exactly(&b));
    }

    #[test]
    fn test_technologies_never_match() {
        let c: Carrier = cable(514000).into();
        let t: Carrier = TerrestrialCarrier::new(514000, Bandwidth::Eight).into();
        assert!(!c.loosely(&t));
    }

    #[rstest]
    #[case(cable(346000).into(), true)]
    #[case(CableCarrier::new(346000, 6900, CableModulation::Qam256).into(), false)]
    #[case(TerrestrialCarrier::new(514000, Bandwidth::Eight).into(), true)]
    #[case(TerrestrialCarrier::new(514000, Bandwidth::NotDefined).into(), false)]
    #[case(astra().into(), true)]
    #[case(astra().with_s2(RollOff::NotDefined).into(), false)]
    #[case(SatelliteCarrier::new(11836000, 27500, Polarization::Horizontal).into(), false)]
    fn test_completeness(#[case] carrier: Carrier, #[case] expected: bool) {
        assert_eq!(carrier.is_complete(), expected);
    }

    #[test]
    fn test_adopt_corrections() {
        let tuned: Carrier = cable(346000).with_inversion(SpectrumInversion::Off).with_bandwidth(Bandwidth::Seven).into();
        let mut sibling: Carrier = CableCarrier::new(354000, 6900, CableModulation::Qam64).into();
        sibling.adopt_corrections(&tuned);
        assert_eq!(sibling.inversion(), Some(SpectrumInversion::Off));
        let Carrier::Cable(sibling) = sibling else { unreachable!() };
        assert_eq!(sibling.bandwidth, Bandwidth::Seven);
        assert_eq!(sibling.frequency, 354000);
    }
}
