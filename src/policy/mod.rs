//! Turns the registry's candidates and the user's preference into the one
//! endpoint a read should use.

use {
    crate::{
        chain_config::ChainId,
        registry::{EndpointCandidate, EndpointRegistry, EndpointSource, ResolutionToken},
    },
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
    strum_macros::{Display, EnumString},
    tracing::debug,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ReadKind {
    #[default]
    Current,
    /// Reads against state older than the node's pruning window.
    Archive,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "url", rename_all = "camelCase")]
pub enum ResolutionState {
    #[default]
    Unresolved,
    Resolved(String),
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub url: String,
    pub token: ResolutionToken,
    pub source: EndpointSource,
    /// The preferred source could not serve this read and Public stood in.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("chain {0} is not supported")]
    UnsupportedChain(ChainId),

    #[error("no archive-capable endpoint available for chain {0}")]
    NoArchiveEndpointAvailable(ChainId),

    #[error("no usable endpoint available for chain {0}")]
    NoUsableEndpoint(ChainId),
}

/// Picks the endpoint for `(chain_id, kind)` without touching any state.
pub fn select(
    registry: &EndpointRegistry,
    chain_id: ChainId,
    kind: ReadKind,
) -> Result<EndpointConfig, ResolutionError> {
    let public = registry
        .candidate(chain_id, EndpointSource::Public)
        .ok_or(ResolutionError::UnsupportedChain(chain_id))?;
    let preferred = registry.preference().source.endpoint_source();
    let candidate = registry.candidate(chain_id, preferred).unwrap_or(public);

    let serves: fn(&EndpointCandidate) -> bool = match kind {
        ReadKind::Current => EndpointCandidate::serves_current,
        ReadKind::Archive => EndpointCandidate::serves_archive,
    };
    let chosen = [candidate, public]
        .into_iter()
        .find(|candidate| serves(candidate))
        .ok_or(match kind {
            ReadKind::Current => ResolutionError::NoUsableEndpoint(chain_id),
            ReadKind::Archive => ResolutionError::NoArchiveEndpointAvailable(chain_id),
        })?;

    Ok(EndpointConfig {
        url: chosen.url.clone(),
        token: registry.token(),
        source: chosen.source,
        fallback: chosen.source != preferred,
    })
}

/// Remembers what each `(chain, read kind)` last resolved to.
#[derive(Debug, Default)]
pub struct ResolutionPolicy {
    states: HashMap<(ChainId, ReadKind), ResolutionState>,
}

impl ResolutionPolicy {
    pub fn resolve(
        &mut self,
        registry: &EndpointRegistry,
        chain_id: ChainId,
        kind: ReadKind,
    ) -> Result<EndpointConfig, ResolutionError> {
        let selected = select(registry, chain_id, kind);
        self.record(chain_id, kind, &selected);
        selected
    }

    pub fn state(&self, chain_id: ChainId, kind: ReadKind) -> ResolutionState {
        self.states
            .get(&(chain_id, kind))
            .cloned()
            .unwrap_or_default()
    }

    /// Back to `Unresolved` everywhere, after a preference change or a chain
    /// switch.
    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// Re-evaluates the chain after the registry took a probe result. A
    /// pending `(chain, kind)` only resolves when the probed candidate
    /// belongs to the active source and turned out usable.
    pub fn observe_probe(
        &mut self,
        registry: &EndpointRegistry,
        chain_id: ChainId,
        source: EndpointSource,
        usable: bool,
    ) {
        let active = source == registry.preference().source.endpoint_source();
        for kind in [ReadKind::Current, ReadKind::Archive] {
            let pending = self.state(chain_id, kind) == ResolutionState::Unresolved;
            if pending && !(active && usable) {
                continue;
            }
            let selected = select(registry, chain_id, kind);
            self.record(chain_id, kind, &selected);
        }
    }

    fn record(
        &mut self,
        chain_id: ChainId,
        kind: ReadKind,
        selected: &Result<EndpointConfig, ResolutionError>,
    ) {
        let state = match selected {
            Ok(config) => ResolutionState::Resolved(config.url.clone()),
            Err(ResolutionError::UnsupportedChain(_)) => return,
            Err(_) => ResolutionState::Degraded,
        };
        if let Some(previous) = self.states.insert((chain_id, kind), state.clone()) {
            if previous != state {
                debug!("chain {chain_id} {kind} reads moved from {previous:?} to {state:?}");
            }
        }
    }
}
