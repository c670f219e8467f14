//! One user's endpoint state: registry, resolution policy, wallet context,
//! probe ordering and the persistence writer.

use {
    crate::{
        chain_config::{ChainConfig, ChainId},
        error::{ResolverError, ResolverResult},
        policy::{EndpointConfig, ReadKind, ResolutionError, ResolutionPolicy, ResolutionState},
        probe::{HealthProbe, ProbeDisposition, ProbeResult, ProbeSequencer, ProbeTicket},
        registry::{
            EndpointCandidate, EndpointRegistry, EndpointSource, PreferenceSource, RegistryError,
            ResolutionToken, UserEndpointPreference,
        },
        utils::validators::is_evm_address,
    },
    serde::{Deserialize, Serialize},
    std::sync::{Mutex, MutexGuard, PoisonError},
    tracing::{debug, info},
};

mod persistence;

pub use persistence::*;

/// What the wallet library reports about the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletContext {
    pub chain_id: ChainId,
    pub address: String,
    /// RPC URL of the wallet's injected provider, when it exposes one.
    pub provider_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub selected_chain: Option<ChainId>,
    pub subject_address: Option<String>,
    pub wallet: Option<WalletContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    #[serde(flatten)]
    pub result: ProbeResult,
    pub disposition: ProbeDisposition,
    pub token: ResolutionToken,
}

/// A started probe. Hand it back to [`Session::complete_probe`] with the
/// result.
#[derive(Debug, Clone)]
pub struct PendingProbe {
    pub chain: ChainConfig,
    ticket: Option<ProbeTicket>,
}

#[derive(Debug)]
struct Inner {
    registry: EndpointRegistry,
    policy: ResolutionPolicy,
    sequencer: ProbeSequencer,
    context: SessionContext,
}

impl Inner {
    /// Chain or subject changed: pending probes no longer apply and every
    /// resolution starts over.
    fn context_changed(&mut self) {
        self.sequencer.bump_epoch();
        self.policy.reset();
    }
}

pub struct Session {
    inner: Mutex<Inner>,
    probe: HealthProbe,
    writer: PreferenceWriter,
}

impl Session {
    /// Restores the stored preference and starts the persistence writer.
    /// Must run inside a tokio runtime.
    pub async fn load(
        chains: impl IntoIterator<Item = ChainConfig>,
        probe: HealthProbe,
        store: PreferenceStore,
    ) -> Self {
        let preference = store.load().await;
        info!("loaded endpoint preference {}", preference.source);
        let registry = EndpointRegistry::new(chains).with_preference(preference);

        Self {
            inner: Mutex::new(Inner {
                registry,
                policy: ResolutionPolicy::default(),
                sequencer: ProbeSequencer::default(),
                context: SessionContext::default(),
            }),
            probe,
            writer: PreferenceWriter::spawn(store),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, inner: &Inner) {
        self.writer.schedule(inner.registry.preference().clone());
    }

    pub fn get_endpoint_config(
        &self,
        chain_id: ChainId,
        kind: ReadKind,
    ) -> Result<EndpointConfig, ResolutionError> {
        let inner = &mut *self.lock();
        inner.policy.resolve(&inner.registry, chain_id, kind)
    }

    pub fn resolution_state(&self, chain_id: ChainId, kind: ReadKind) -> ResolutionState {
        self.lock().policy.state(chain_id, kind)
    }

    pub fn chains(&self) -> Vec<ChainConfig> {
        self.lock().registry.chains().cloned().collect()
    }

    pub fn list_candidates(&self, chain_id: ChainId) -> Result<Vec<EndpointCandidate>, RegistryError> {
        self.lock().registry.list_candidates(chain_id)
    }

    pub fn preference(&self) -> UserEndpointPreference {
        self.lock().registry.preference().clone()
    }

    pub fn current_token(&self) -> ResolutionToken {
        self.lock().registry.token()
    }

    pub fn context(&self) -> SessionContext {
        self.lock().context.clone()
    }

    pub fn set_preference_source(&self, source: PreferenceSource) {
        let mut inner = self.lock();
        if inner.registry.set_source(source) {
            inner.policy.reset();
            self.persist(&inner);
        }
    }

    pub fn set_custom_endpoint(&self, chain_id: ChainId, url: &str) -> Result<(), RegistryError> {
        let mut inner = self.lock();
        if inner.registry.upsert_custom(chain_id, url)? {
            inner.policy.reset();
            self.persist(&inner);
        }
        Ok(())
    }

    pub fn clear_custom_endpoint(&self, chain_id: ChainId) -> Result<(), RegistryError> {
        let mut inner = self.lock();
        if inner.registry.clear_custom(chain_id)? {
            inner.policy.reset();
            self.persist(&inner);
        }
        Ok(())
    }

    /// Probes `url` and, when it is one of the chain's candidates and no
    /// newer probe or context change got in the way, records the result.
    pub async fn probe(
        &self,
        chain_id: ChainId,
        url: &str,
        subject_address: &str,
    ) -> ResolverResult<ProbeResult> {
        Ok(self.probe_tracked(chain_id, url, subject_address).await?.result)
    }

    #[tracing::instrument(skip(self, subject_address), level = "debug")]
    pub async fn probe_tracked(
        &self,
        chain_id: ChainId,
        url: &str,
        subject_address: &str,
    ) -> ResolverResult<ProbeOutcome> {
        if !is_evm_address(subject_address) {
            return Err(ResolverError::InvalidAddress(subject_address.to_string()));
        }
        let pending = self.begin_probe(chain_id, url)?;
        let result = self
            .probe
            .check_endpoint(url, &pending.chain, subject_address)
            .await;
        let disposition = self.complete_probe(pending, &result);

        Ok(ProbeOutcome {
            result,
            disposition,
            token: self.current_token(),
        })
    }

    pub fn begin_probe(&self, chain_id: ChainId, url: &str) -> Result<PendingProbe, RegistryError> {
        let inner = &mut *self.lock();
        let chain = inner
            .registry
            .chain(chain_id)
            .cloned()
            .ok_or(RegistryError::UnsupportedChain(chain_id))?;
        let ticket = inner
            .registry
            .source_for_url(chain_id, url.trim())
            .map(|source| inner.sequencer.begin(chain_id, source));

        Ok(PendingProbe { chain, ticket })
    }

    pub fn complete_probe(&self, pending: PendingProbe, result: &ProbeResult) -> ProbeDisposition {
        let Some(ticket) = pending.ticket else {
            return ProbeDisposition::Unmatched;
        };

        let inner = &mut *self.lock();
        let disposition = match inner.sequencer.admit(&ticket) {
            ProbeDisposition::Applied => {
                if inner
                    .registry
                    .mark_validated(ticket.chain_id, ticket.source, result)
                {
                    inner.policy.observe_probe(
                        &inner.registry,
                        ticket.chain_id,
                        ticket.source,
                        result.is_usable(),
                    );
                    ProbeDisposition::Applied
                } else {
                    // The candidate changed URL while the probe ran.
                    ProbeDisposition::Superseded
                }
            }
            other => other,
        };

        debug!(
            "probe of {} on chain {}: {disposition}",
            result.url, ticket.chain_id
        );
        if disposition == ProbeDisposition::Applied
            && ticket.source == EndpointSource::Custom
        {
            self.persist(inner);
        }
        disposition
    }

    /// Wallet connected or switched account. Installs its injected provider
    /// as the WalletInjected candidate.
    pub fn connect_wallet(&self, wallet: WalletContext) -> ResolverResult<()> {
        if !is_evm_address(&wallet.address) {
            return Err(ResolverError::InvalidAddress(wallet.address));
        }
        let inner = &mut *self.lock();
        if inner.registry.chain(wallet.chain_id).is_none() {
            return Err(RegistryError::UnsupportedChain(wallet.chain_id).into());
        }

        match &wallet.provider_url {
            Some(url) => {
                inner.registry.attach_wallet(wallet.chain_id, url)?;
            }
            None => {
                inner.registry.detach_wallet();
            }
        }

        let context = &mut inner.context;
        let changed = context.selected_chain != Some(wallet.chain_id)
            || context.subject_address.as_deref() != Some(wallet.address.as_str());
        context.selected_chain = Some(wallet.chain_id);
        context.subject_address = Some(wallet.address.clone());
        context.wallet = Some(wallet);
        if changed {
            inner.context_changed();
        }
        Ok(())
    }

    pub fn disconnect_wallet(&self) {
        let inner = &mut *self.lock();
        if inner.context.wallet.take().is_none() {
            return;
        }
        inner.registry.detach_wallet();
        inner.context.subject_address = None;
        inner.context_changed();
        info!("wallet disconnected");
    }

    /// The injected provider is scoped to the chain it was handed out for,
    /// so switching drops it until the wallet reconnects.
    pub fn switch_chain(&self, chain_id: ChainId) -> Result<(), RegistryError> {
        let inner = &mut *self.lock();
        if inner.registry.chain(chain_id).is_none() {
            return Err(RegistryError::UnsupportedChain(chain_id));
        }
        if inner.context.selected_chain == Some(chain_id) {
            return Ok(());
        }

        inner.context.selected_chain = Some(chain_id);
        if let Some(wallet) = inner.context.wallet.as_mut() {
            wallet.chain_id = chain_id;
            wallet.provider_url = None;
            inner.registry.detach_wallet();
        }
        inner.context_changed();
        Ok(())
    }

    pub fn set_subject_address(&self, address: Option<String>) -> ResolverResult<()> {
        if let Some(address) = &address {
            if !is_evm_address(address) {
                return Err(ResolverError::InvalidAddress(address.clone()));
            }
        }
        let inner = &mut *self.lock();
        if inner.context.subject_address != address {
            inner.context.subject_address = address;
            inner.context_changed();
        }
        Ok(())
    }

    pub async fn flush(&self) {
        self.writer.flush().await
    }

    pub async fn shutdown(&self) {
        self.writer.shutdown().await
    }
}
