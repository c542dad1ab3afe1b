//! Scan protocol: one record per observed outcome.

use std::fmt::{Display, Formatter, Result as FmtResult};

use sweep_catalog::{Carrier, Origin, Station};

/// Outcome tagged by a [`ProtocolRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolMode {
    /// A carrier was tuned but delivered no metadata.
    EmptyGroup,
    /// A previously known source is still broadcast.
    Found,
    /// A previously known source was not seen; it is kept in the catalog.
    NotFound,
    /// A source not in the previous catalog.
    Added,
}
impl ProtocolMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolMode::EmptyGroup => "EmptyGroup",
            ProtocolMode::Found => "Found",
            ProtocolMode::NotFound => "NotFound",
            ProtocolMode::Added => "Added",
        }
    }
}
impl Display for ProtocolMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ProtocolRecord {
    pub mode: ProtocolMode,
    pub origin: Origin,
    pub carrier: Carrier,
    /// Absent for [`ProtocolMode::EmptyGroup`].
    pub source: Option<Station>,
}
impl ProtocolRecord {
    /// Column header matching the [`Display`] output.
    pub const LINE_FORMAT: &'static str =
        "Mode\tName\tProvider\tNetwork\tTransportstream\tService\tNVOD\tEncrypted\tType\tGroup\tLocation";

    pub fn empty_group(origin: &Origin, carrier: &Carrier) -> Self {
        Self { mode: ProtocolMode::EmptyGroup, origin: origin.clone(), carrier: carrier.clone(), source: None }
    }

    pub fn source(mode: ProtocolMode, origin: &Origin, carrier: &Carrier, station: &Station) -> Self {
        Self { mode, origin: origin.clone(), carrier: carrier.clone(), source: Some(station.clone()) }
    }
}
impl Display for ProtocolRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.source {
            Some(s) => write!(
                f,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                self.mode,
                s.name,
                s.provider,
                s.id.network,
                s.id.transport_stream,
                s.id.service,
                s.is_service,
                s.encrypted,
                s.kind,
                self.carrier,
                self.origin
            ),
            None => write!(f, "{}\t\t\t\t\t\t\t\t\t{}\t{}", self.mode, self.carrier, self.origin),
        }
    }
}
