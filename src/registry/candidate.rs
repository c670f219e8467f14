use {
    crate::{chain_config::ChainId, probe::ProbeResult},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumString},
};

/// Where a candidate endpoint came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum EndpointSource {
    /// Built-in endpoint for the chain.
    Public,
    /// Provider injected by the connected wallet. Lives as long as the
    /// wallet session.
    WalletInjected,
    /// Entered by the user, persisted per chain.
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointCandidate {
    pub chain_id: ChainId,
    pub source: EndpointSource,
    pub url: String,
    pub is_archive_capable: bool,
    pub last_validated_at: Option<DateTime<Utc>>,
    pub is_valid: bool,
}

impl EndpointCandidate {
    pub fn new(chain_id: ChainId, source: EndpointSource, url: impl Into<String>) -> Self {
        Self {
            chain_id,
            source,
            url: url.into(),
            is_archive_capable: false,
            last_validated_at: None,
            is_valid: false,
        }
    }

    pub fn with_archive_capable(mut self, archive: bool) -> Self {
        self.is_archive_capable = archive;
        self
    }

    pub fn is_probed(&self) -> bool {
        self.last_validated_at.is_some()
    }

    /// Usable for current-state reads. Candidates nobody probed yet are
    /// accepted optimistically; the first real call surfaces their errors.
    pub fn serves_current(&self) -> bool {
        self.is_valid || !self.is_probed()
    }

    pub fn serves_archive(&self) -> bool {
        self.is_archive_capable && self.serves_current()
    }

    /// Records a probe outcome. Returns whether `is_valid` flipped.
    pub(super) fn record(&mut self, result: &ProbeResult, at: DateTime<Utc>) -> bool {
        let was_valid = self.is_valid;
        self.is_valid = result.is_usable();
        self.is_archive_capable = result.is_usable() && result.archive_capable;
        self.last_validated_at = Some(at);
        was_valid != self.is_valid
    }
}
