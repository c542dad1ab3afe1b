use sweep_catalog::{Carrier, Station};

/// Metadata read from a tuned carrier: its transport stream id and the
/// sources it carries.
#[derive(Debug, Clone, Default)]
pub struct GroupInfo {
    pub transport_stream: Option<u16>,
    pub sources: Vec<Station>,
}
impl GroupInfo {
    pub fn new(sources: impl IntoIterator<Item = Station>) -> Self {
        Self { transport_stream: None, sources: sources.into_iter().collect() }
    }
}

/// Network information table: the carriers a network announces as its own.
#[derive(Debug, Clone, Default)]
pub struct NetworkTable {
    pub network: Option<u16>,
    pub name: Option<String>,
    pub carriers: Vec<Carrier>,
}
impl NetworkTable {
    pub fn new(carriers: impl IntoIterator<Item = Carrier>) -> Self {
        Self { carriers: carriers.into_iter().collect(), ..Default::default() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
