use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use exn::{OptionExt, ResultExt};

use crate::{
    consts,
    error::{Error, ErrorKind},
};

named_enum! {
    /// Broad category of a broadcast source.
    SourceKind {
        Television => "TV",
        Radio => "Radio",
        #[default]
        Unknown => "Unknown",
    }
}
impl SourceKind {
    /// Every kind, in counter order.
    pub const ALL: [SourceKind; 3] = [Self::Television, Self::Radio, Self::Unknown];

    /// Position of this kind in [`SourceKind::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Television => 0,
            Self::Radio => 1,
            Self::Unknown => 2,
        }
    }
}

/// Identity of a broadcast source: original network, transport stream and
/// service id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceId {
    pub network: u16,
    pub transport_stream: u16,
    pub service: u16,
}
impl SourceId {
    pub fn new(network: u16, transport_stream: u16, service: u16) -> Self {
        Self { network, transport_stream, service }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "({}, {}, {})", self.network, self.transport_stream, self.service)
    }
}
impl FromStr for SourceId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = consts::SOURCE_ID_REGEX
            .captures(s.trim())
            .ok_or_raise(|| ErrorKind::ParseError { field: "source_id", value: s.to_string() })?;
        let id = |index: usize| -> Result<u16, Error> {
            let raw = captures.get(index).map_or("", |m| m.as_str().trim());
            raw.parse::<u16>().or_raise(|| ErrorKind::ParseError { field: "source_id", value: s.to_string() })
        };
        Ok(Self::new(id(1)?, id(2)?, id(3)?))
    }
}

/// A broadcast source (service) as carried by one group.
///
/// Two stations are the same source when their [`SourceId`]s are equal; the
/// descriptive fields are whatever the network announced last.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub id: SourceId,
    pub name: String,
    pub provider: String,
    pub encrypted: bool,
    pub is_service: bool,
    pub kind: SourceKind,
}
impl Station {
    pub fn new(id: SourceId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), ..Default::default() }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    pub fn service(mut self, is_service: bool) -> Self {
        self.is_service = is_service;
        self
    }

    /// Same source, regardless of the descriptive fields.
    pub fn same_source(&self, other: &Station) -> bool {
        self.id == other.id
    }
}
