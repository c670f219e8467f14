use {
    serde::Deserialize,
    serde_piecewise_default::DeserializePiecewiseDefault,
    std::time::Duration,
};

#[derive(DeserializePiecewiseDefault, Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Budget for a whole endpoint probe, shared by all of its RPC calls.
    pub timeout_ms: u64,
    /// How far back the historical read goes. Converted to a block offset
    /// with the chain's block time.
    pub archive_lookback_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            archive_lookback_secs: 24 * 60 * 60,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn archive_lookback(&self) -> Duration {
        Duration::from_secs(self.archive_lookback_secs)
    }
}
