use {
    crate::{chain_config::ChainId, registry::EndpointSource},
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
    strum_macros::Display,
};

/// Issued when a probe starts; presented again when its result comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTicket {
    pub chain_id: ChainId,
    pub source: EndpointSource,
    seq: u64,
    epoch: u64,
}

/// What happened to a finished probe's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ProbeDisposition {
    /// Written to the registry.
    Applied,
    /// A newer probe of the same candidate was started meanwhile.
    Superseded,
    /// The chain or subject address changed while the probe ran.
    Cancelled,
    /// The URL is not a registered candidate, so there was nothing to update.
    Unmatched,
}

/// Orders concurrent probes. Only the most recently started probe per
/// `(chain, source)` is admitted, and nothing started before the last
/// context change.
#[derive(Debug, Default)]
pub struct ProbeSequencer {
    epoch: u64,
    next_seq: u64,
    latest: HashMap<(ChainId, EndpointSource), u64>,
}

impl ProbeSequencer {
    pub fn begin(&mut self, chain_id: ChainId, source: EndpointSource) -> ProbeTicket {
        self.next_seq += 1;
        self.latest.insert((chain_id, source), self.next_seq);
        ProbeTicket {
            chain_id,
            source,
            seq: self.next_seq,
            epoch: self.epoch,
        }
    }

    /// Invalidates every ticket issued so far.
    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
        self.latest.clear();
    }

    pub fn admit(&self, ticket: &ProbeTicket) -> ProbeDisposition {
        if ticket.epoch != self.epoch {
            return ProbeDisposition::Cancelled;
        }
        match self.latest.get(&(ticket.chain_id, ticket.source)) {
            Some(seq) if *seq == ticket.seq => ProbeDisposition::Applied,
            _ => ProbeDisposition::Superseded,
        }
    }
}
