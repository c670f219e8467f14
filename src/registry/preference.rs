use {
    super::{EndpointCandidate, EndpointSource},
    crate::chain_config::ChainId,
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
    strum_macros::{Display, EnumString},
};

/// Which source the user routes traffic through. Exactly one is active.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PreferenceSource {
    #[default]
    Public,
    Wallet,
    Custom,
}

impl PreferenceSource {
    pub fn endpoint_source(self) -> EndpointSource {
        match self {
            Self::Public => EndpointSource::Public,
            Self::Wallet => EndpointSource::WalletInjected,
            Self::Custom => EndpointSource::Custom,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEndpointPreference {
    pub source: PreferenceSource,
    /// At most one custom endpoint per chain.
    #[serde(default)]
    pub custom: BTreeMap<ChainId, EndpointCandidate>,
}

impl UserEndpointPreference {
    pub fn use_public(&self) -> bool {
        self.source == PreferenceSource::Public
    }

    pub fn use_wallet(&self) -> bool {
        self.source == PreferenceSource::Wallet
    }

    pub fn use_custom(&self) -> bool {
        self.source == PreferenceSource::Custom
    }

    pub fn custom(&self, chain_id: ChainId) -> Option<&EndpointCandidate> {
        self.custom.get(&chain_id)
    }
}
