use {
    serde::{Deserialize, Serialize},
    std::{sync::LazyLock, time::Duration},
};

pub type ChainId = u64;

// Public endpoints are the fallback for every other source, so only list
// chains whose public RPC is free to use without a key.
pub static ACTIVE_CONFIG: LazyLock<Config> = LazyLock::new(|| Config {
    chains: vec![
        ChainConfig {
            chain_id: 1,
            name: "Ethereum".to_string(),
            block_time_ms: 12_000,
            explorer_url: "https://etherscan.io".to_string(),
            public_rpc_url: "https://ethereum-rpc.publicnode.com".to_string(),
            public_rpc_archive: true,
        },
        ChainConfig {
            chain_id: 10,
            name: "Optimism".to_string(),
            block_time_ms: 2_000,
            explorer_url: "https://optimistic.etherscan.io".to_string(),
            public_rpc_url: "https://mainnet.optimism.io".to_string(),
            public_rpc_archive: false,
        },
        ChainConfig {
            chain_id: 56,
            name: "BNB Smart Chain".to_string(),
            block_time_ms: 3_000,
            explorer_url: "https://bscscan.com".to_string(),
            public_rpc_url: "https://bsc-dataseed.bnbchain.org".to_string(),
            public_rpc_archive: false,
        },
        ChainConfig {
            chain_id: 100,
            name: "Gnosis Chain".to_string(),
            block_time_ms: 5_000,
            explorer_url: "https://gnosisscan.io".to_string(),
            public_rpc_url: "https://rpc.gnosischain.com".to_string(),
            public_rpc_archive: false,
        },
        ChainConfig {
            chain_id: 137,
            name: "Polygon".to_string(),
            block_time_ms: 2_000,
            explorer_url: "https://polygonscan.com".to_string(),
            public_rpc_url: "https://polygon-rpc.com".to_string(),
            public_rpc_archive: false,
        },
        ChainConfig {
            chain_id: 8453,
            name: "Base".to_string(),
            block_time_ms: 2_000,
            explorer_url: "https://basescan.org".to_string(),
            public_rpc_url: "https://mainnet.base.org".to_string(),
            public_rpc_archive: false,
        },
        ChainConfig {
            chain_id: 42161,
            name: "Arbitrum One".to_string(),
            block_time_ms: 250,
            explorer_url: "https://arbiscan.io".to_string(),
            public_rpc_url: "https://arb1.arbitrum.io/rpc".to_string(),
            public_rpc_archive: false,
        },
        ChainConfig {
            chain_id: 43114,
            name: "Avalanche C-Chain".to_string(),
            block_time_ms: 2_000,
            explorer_url: "https://snowtrace.io".to_string(),
            public_rpc_url: "https://api.avax.network/ext/bc/C/rpc".to_string(),
            public_rpc_archive: false,
        },
        ChainConfig {
            chain_id: 11155111,
            name: "Sepolia".to_string(),
            block_time_ms: 12_000,
            explorer_url: "https://sepolia.etherscan.io".to_string(),
            public_rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
            public_rpc_archive: true,
        },
    ],
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub chains: Vec<ChainConfig>,
}

impl Config {
    pub fn chain(&self, chain_id: ChainId) -> Option<&ChainConfig> {
        self.chains.iter().find(|chain| chain.chain_id == chain_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_id: ChainId,
    pub name: String,
    /// Average seconds per block, in milliseconds so sub-second chains fit.
    pub block_time_ms: u64,
    pub explorer_url: String,
    pub public_rpc_url: String,
    /// Last known archive capability of `public_rpc_url`.
    pub public_rpc_archive: bool,
}

impl ChainConfig {
    pub fn block_time(&self) -> Duration {
        Duration::from_millis(self.block_time_ms)
    }

    /// Number of blocks produced over `window`, rounded up.
    pub fn blocks_in(&self, window: Duration) -> u64 {
        let block_time_ms = self.block_time_ms.max(1) as u128;
        window.as_millis().div_ceil(block_time_ms) as u64
    }
}
