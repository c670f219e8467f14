use {
    crate::{
        chain_config::ChainId,
        registry::{EndpointCandidate, PreferenceSource, ResolutionToken, UserEndpointPreference},
    },
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

pub mod candidates;
pub mod chains;
pub mod context;
pub mod custom;
pub mod endpoint;
pub mod health;
pub mod metrics;
pub mod preference;
pub mod probe;
pub mod wallet;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidatesResponseBody {
    pub chain_id: ChainId,
    pub candidates: Vec<EndpointCandidate>,
    pub token: ResolutionToken,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceResponseBody {
    pub source: PreferenceSource,
    pub use_public: bool,
    pub use_wallet: bool,
    pub use_custom: bool,
    /// Custom endpoint URL per chain.
    pub custom: BTreeMap<ChainId, String>,
    pub token: ResolutionToken,
}

impl PreferenceResponseBody {
    pub fn new(preference: &UserEndpointPreference, token: ResolutionToken) -> Self {
        Self {
            source: preference.source,
            use_public: preference.use_public(),
            use_wallet: preference.use_wallet(),
            use_custom: preference.use_custom(),
            custom: preference
                .custom
                .iter()
                .map(|(chain_id, candidate)| (*chain_id, candidate.url.clone()))
                .collect(),
            token,
        }
    }
}
