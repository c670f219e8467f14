//! Single source of truth for which endpoints exist per chain.

use {
    crate::{
        chain_config::{ChainConfig, ChainId},
        probe::ProbeResult,
        utils::validators::{validate_endpoint_url, InvalidUrl},
    },
    chrono::Utc,
    derive_more::{Display, From, Into},
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
    tracing::{debug, info, warn},
};

mod candidate;
mod preference;

pub use {candidate::*, preference::*};

/// Bumped on every mutation that can change which endpoint a read resolves
/// to. Starts at 0 and never goes back.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, From, Into, Display,
)]
#[serde(transparent)]
pub struct ResolutionToken(u64);

impl ResolutionToken {
    fn bump(&mut self) {
        self.0 += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrl),

    #[error("chain {0} is not supported")]
    UnsupportedChain(ChainId),
}

#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    chains: BTreeMap<ChainId, ChainConfig>,
    public: BTreeMap<ChainId, EndpointCandidate>,
    wallet: Option<EndpointCandidate>,
    preference: UserEndpointPreference,
    token: ResolutionToken,
}

impl EndpointRegistry {
    pub fn new(chains: impl IntoIterator<Item = ChainConfig>) -> Self {
        let chains: BTreeMap<_, _> = chains
            .into_iter()
            .map(|chain| (chain.chain_id, chain))
            .collect();
        let public = chains
            .values()
            .map(|chain| {
                let candidate = EndpointCandidate::new(
                    chain.chain_id,
                    EndpointSource::Public,
                    chain.public_rpc_url.clone(),
                )
                .with_archive_capable(chain.public_rpc_archive);
                (chain.chain_id, candidate)
            })
            .collect();

        Self {
            chains,
            public,
            wallet: None,
            preference: UserEndpointPreference::default(),
            token: ResolutionToken::default(),
        }
    }

    /// Installs a preference loaded from storage. Entries for chains this
    /// registry does not know, or with unusable URLs, are dropped.
    pub fn with_preference(mut self, mut preference: UserEndpointPreference) -> Self {
        preference.custom.retain(|chain_id, candidate| {
            let keep = self.chains.contains_key(chain_id)
                && candidate.chain_id == *chain_id
                && candidate.source == EndpointSource::Custom
                && validate_endpoint_url(&candidate.url).is_ok();
            if !keep {
                warn!("dropping stored custom endpoint for chain {chain_id}");
            }
            keep
        });
        self.preference = preference;
        self
    }

    pub fn chains(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.values()
    }

    pub fn chain(&self, chain_id: ChainId) -> Option<&ChainConfig> {
        self.chains.get(&chain_id)
    }

    pub fn token(&self) -> ResolutionToken {
        self.token
    }

    pub fn preference(&self) -> &UserEndpointPreference {
        &self.preference
    }

    /// Public first, then the wallet's provider, then the user's endpoint.
    pub fn list_candidates(&self, chain_id: ChainId) -> Result<Vec<EndpointCandidate>, RegistryError> {
        let public = self
            .public
            .get(&chain_id)
            .ok_or(RegistryError::UnsupportedChain(chain_id))?;

        Ok([EndpointSource::WalletInjected, EndpointSource::Custom]
            .into_iter()
            .filter_map(|source| self.candidate(chain_id, source))
            .fold(vec![public.clone()], |mut candidates, candidate| {
                candidates.push(candidate.clone());
                candidates
            }))
    }

    pub fn candidate(&self, chain_id: ChainId, source: EndpointSource) -> Option<&EndpointCandidate> {
        match source {
            EndpointSource::Public => self.public.get(&chain_id),
            EndpointSource::WalletInjected => self
                .wallet
                .as_ref()
                .filter(|wallet| wallet.chain_id == chain_id),
            EndpointSource::Custom => self.preference.custom(chain_id),
        }
    }

    fn candidate_mut(
        &mut self,
        chain_id: ChainId,
        source: EndpointSource,
    ) -> Option<&mut EndpointCandidate> {
        match source {
            EndpointSource::Public => self.public.get_mut(&chain_id),
            EndpointSource::WalletInjected => self
                .wallet
                .as_mut()
                .filter(|wallet| wallet.chain_id == chain_id),
            EndpointSource::Custom => self.preference.custom.get_mut(&chain_id),
        }
    }

    /// Which registered candidate of the chain uses `url`, if any.
    pub fn source_for_url(&self, chain_id: ChainId, url: &str) -> Option<EndpointSource> {
        [
            EndpointSource::Custom,
            EndpointSource::WalletInjected,
            EndpointSource::Public,
        ]
        .into_iter()
        .find(|source| {
            self.candidate(chain_id, *source)
                .is_some_and(|candidate| candidate.url == url)
        })
    }

    /// Replaces the chain's custom endpoint. Resubmitting the current URL is
    /// a no-op; returns whether anything changed.
    pub fn upsert_custom(&mut self, chain_id: ChainId, url: &str) -> Result<bool, RegistryError> {
        let url = validate_endpoint_url(url)?;
        if !self.chains.contains_key(&chain_id) {
            return Err(RegistryError::UnsupportedChain(chain_id));
        }
        if self
            .preference
            .custom(chain_id)
            .is_some_and(|candidate| candidate.url == url)
        {
            return Ok(false);
        }

        info!("custom endpoint for chain {chain_id} set to {url}");
        self.preference.custom.insert(
            chain_id,
            EndpointCandidate::new(chain_id, EndpointSource::Custom, url),
        );
        self.token.bump();
        Ok(true)
    }

    pub fn clear_custom(&mut self, chain_id: ChainId) -> Result<bool, RegistryError> {
        if !self.chains.contains_key(&chain_id) {
            return Err(RegistryError::UnsupportedChain(chain_id));
        }
        if self.preference.custom.remove(&chain_id).is_none() {
            return Ok(false);
        }
        info!("custom endpoint for chain {chain_id} cleared");
        self.token.bump();
        Ok(true)
    }

    /// Applies a probe outcome to the matching candidate. Results for a URL
    /// the candidate no longer has are ignored. Returns whether a candidate
    /// was updated.
    pub fn mark_validated(
        &mut self,
        chain_id: ChainId,
        source: EndpointSource,
        result: &ProbeResult,
    ) -> bool {
        let Some(candidate) = self.candidate_mut(chain_id, source) else {
            debug!("no {source} candidate on chain {chain_id} for probe of {}", result.url);
            return false;
        };
        if candidate.url != result.url {
            debug!(
                "ignoring probe of {} for {source} candidate now at {}",
                result.url, candidate.url
            );
            return false;
        }

        if candidate.record(result, Utc::now()) {
            debug!(
                "{source} endpoint on chain {chain_id} is now {}",
                if candidate.is_valid { "valid" } else { "invalid" }
            );
            self.token.bump();
        }
        true
    }

    pub fn set_source(&mut self, source: PreferenceSource) -> bool {
        if self.preference.source == source {
            return false;
        }
        info!("endpoint preference switched to {source}");
        self.preference.source = source;
        self.token.bump();
        true
    }

    /// Installs the wallet's injected provider for `chain_id`, replacing any
    /// previous one.
    pub fn attach_wallet(&mut self, chain_id: ChainId, url: &str) -> Result<bool, RegistryError> {
        let url = validate_endpoint_url(url)?;
        if !self.chains.contains_key(&chain_id) {
            return Err(RegistryError::UnsupportedChain(chain_id));
        }
        if self
            .wallet
            .as_ref()
            .is_some_and(|wallet| wallet.chain_id == chain_id && wallet.url == url)
        {
            return Ok(false);
        }

        self.wallet = Some(EndpointCandidate::new(
            chain_id,
            EndpointSource::WalletInjected,
            url,
        ));
        self.token.bump();
        Ok(true)
    }

    pub fn detach_wallet(&mut self) -> bool {
        if self.wallet.take().is_none() {
            return false;
        }
        self.token.bump();
        true
    }

    pub fn wallet(&self) -> Option<&EndpointCandidate> {
        self.wallet.as_ref()
    }
}
