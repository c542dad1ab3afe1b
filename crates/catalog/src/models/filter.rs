use super::{SourceId, SourceKind, Station};

/// Per-carrier scan filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupFilter {
    /// Skip this carrier entirely.
    pub exclude_from_scan: bool,
}

/// Per-source filter: exclude the source, or override what the network
/// announces for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceModifier {
    pub id: SourceId,
    pub exclude_from_scan: bool,
    /// Replacement name; ignored when empty.
    pub name: String,
    /// Replacement provider; ignored when empty.
    pub provider: String,
    pub encrypted: Option<bool>,
    pub is_service: Option<bool>,
    pub kind: Option<SourceKind>,
}
impl SourceModifier {
    pub fn new(id: SourceId) -> Self {
        Self { id, ..Default::default() }
    }

    pub fn excluded(mut self) -> Self {
        self.exclude_from_scan = true;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = Some(encrypted);
        self
    }

    pub fn with_service(mut self, is_service: bool) -> Self {
        self.is_service = Some(is_service);
        self
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// `true` if the modifier neither excludes nor overrides anything.
    pub fn is_default(&self) -> bool {
        !self.exclude_from_scan
            && self.name.is_empty()
            && self.provider.is_empty()
            && self.encrypted.is_none()
            && self.is_service.is_none()
            && self.kind.is_none()
    }

    /// Overwrites the announced fields of `station` with every override set
    /// on this modifier.
    pub fn apply_to(&self, station: &mut Station) {
        if !self.name.is_empty() {
            station.name.clone_from(&self.name);
        }
        if !self.provider.is_empty() {
            station.provider.clone_from(&self.provider);
        }
        if let Some(encrypted) = self.encrypted {
            station.encrypted = encrypted;
        }
        if let Some(is_service) = self.is_service {
            station.is_service = is_service;
        }
        if let Some(kind) = self.kind {
            station.kind = kind;
        }
    }
}
