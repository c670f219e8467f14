use {
    crate::{
        chain_config::{ChainConfig, ChainId},
        env::ProbeConfig,
        json_rpc::{is_quantity, parse_quantity, to_quantity},
        transport::{JsonRpcTransport, TransportError},
        utils::validators::validate_endpoint_url,
    },
    serde::{Deserialize, Serialize},
    serde_json::{json, Value},
    std::{sync::Arc, time::Duration},
    strum_macros::Display,
    tokio::time::Instant,
    tracing::debug,
};

mod sequencer;

pub use sequencer::*;

/// Lower bound on how far behind head the historical read goes. Keeps fast
/// chains from passing the archive check against a node that only retains
/// a few minutes of state.
pub const MIN_ARCHIVE_BLOCK_OFFSET: u64 = 1_024;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ProbeErrorKind {
    InvalidUrl,
    Unreachable,
    ChainMismatch,
    StateQueryFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub chain_id: ChainId,
    pub url: String,
    pub subject_address: String,
    pub reachable: bool,
    pub chain_id_matches: bool,
    pub state_query_ok: bool,
    /// Advisory only, never affects usability.
    pub archive_capable: bool,
    pub latency_ms: u64,
    pub error: Option<ProbeErrorKind>,
}

impl ProbeResult {
    fn new(chain_id: ChainId, url: &str, subject_address: &str) -> Self {
        Self {
            chain_id,
            url: url.to_string(),
            subject_address: subject_address.to_string(),
            reachable: false,
            chain_id_matches: false,
            state_query_ok: false,
            archive_capable: false,
            latency_ms: 0,
            error: None,
        }
    }

    fn failed(mut self, error: ProbeErrorKind) -> Self {
        self.error = Some(error);
        self
    }

    pub fn is_usable(&self) -> bool {
        self.reachable && self.chain_id_matches && self.state_query_ok
    }
}

/// Checks that an endpoint is alive, serves the expected chain, answers
/// state queries and keeps historical state.
#[derive(Clone)]
pub struct HealthProbe {
    transport: Arc<dyn JsonRpcTransport>,
    timeout: Duration,
    archive_lookback: Duration,
}

impl HealthProbe {
    pub fn new(transport: Arc<dyn JsonRpcTransport>, config: &ProbeConfig) -> Self {
        Self {
            transport,
            timeout: config.timeout(),
            archive_lookback: config.archive_lookback(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Blocks behind head the historical read targets on `chain`.
    pub fn archive_offset(&self, chain: &ChainConfig) -> u64 {
        chain
            .blocks_in(self.archive_lookback)
            .max(MIN_ARCHIVE_BLOCK_OFFSET)
    }

    /// Runs the probe sequence against `url`. Never fails: transport errors
    /// are folded into the returned [`ProbeResult`]. The whole sequence shares
    /// one deadline.
    #[tracing::instrument(skip(self, chain), fields(chain_id = chain.chain_id), level = "debug")]
    pub async fn check_endpoint(
        &self,
        url: &str,
        chain: &ChainConfig,
        subject_address: &str,
    ) -> ProbeResult {
        let url = match validate_endpoint_url(url) {
            Ok(url) => url,
            Err(e) => {
                debug!("not probing: {e}");
                return ProbeResult::new(chain.chain_id, url, subject_address)
                    .failed(ProbeErrorKind::InvalidUrl);
            }
        };
        let result = ProbeResult::new(chain.chain_id, &url, subject_address);

        let started = Instant::now();
        let deadline = started + self.timeout;

        let mut result = match self.call(&url, "eth_chainId", json!([]), deadline).await {
            Err(e) if e.is_unreachable() => {
                debug!("endpoint unreachable: {e}");
                return result.failed(ProbeErrorKind::Unreachable);
            }
            Err(e) => {
                debug!("endpoint did not report a chain id: {e}");
                return ProbeResult {
                    reachable: true,
                    ..result
                }
                .failed(ProbeErrorKind::ChainMismatch);
            }
            Ok(value) => {
                let reported = parse_quantity(&value);
                let result = ProbeResult {
                    reachable: true,
                    chain_id_matches: reported == Some(chain.chain_id),
                    ..result
                };
                if !result.chain_id_matches {
                    debug!("endpoint reports chain {value}");
                    return result.failed(ProbeErrorKind::ChainMismatch);
                }
                result
            }
        };

        let latest = self
            .call(
                &url,
                "eth_getBalance",
                json!([subject_address, "latest"]),
                deadline,
            )
            .await;
        result.latency_ms = started.elapsed().as_millis() as u64;
        match latest {
            Ok(balance) if is_quantity(&balance) => result.state_query_ok = true,
            Ok(balance) => {
                debug!("unexpected balance response {balance}");
                return result.failed(ProbeErrorKind::StateQueryFailed);
            }
            Err(e) => {
                debug!("state query failed: {e}");
                return result.failed(ProbeErrorKind::StateQueryFailed);
            }
        }

        result.archive_capable = self
            .historical_read(&url, chain, subject_address, deadline)
            .await
            .inspect_err(|e| debug!("historical read failed: {e}"))
            .is_ok();

        result
    }

    async fn historical_read(
        &self,
        url: &str,
        chain: &ChainConfig,
        subject_address: &str,
        deadline: Instant,
    ) -> Result<(), TransportError> {
        let head = self.call(url, "eth_blockNumber", json!([]), deadline).await?;
        let head = parse_quantity(&head)
            .ok_or_else(|| TransportError::InvalidResponse(format!("block number {head}")))?;
        let block = head.saturating_sub(self.archive_offset(chain));

        let balance = self
            .call(
                url,
                "eth_getBalance",
                json!([subject_address, to_quantity(block)]),
                deadline,
            )
            .await?;
        if !is_quantity(&balance) {
            return Err(TransportError::InvalidResponse(format!(
                "balance {balance}"
            )));
        }
        Ok(())
    }

    /// One call with whatever is left of the probe budget.
    async fn call(
        &self,
        url: &str,
        method: &str,
        params: Value,
        deadline: Instant,
    ) -> Result<Value, TransportError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(TransportError::Timeout);
        }
        tokio::time::timeout(
            remaining,
            self.transport.call(url, method, params, remaining),
        )
        .await
        .map_err(|_| TransportError::Timeout)?
    }
}
