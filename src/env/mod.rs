use {
    crate::{
        chain_config::{ChainConfig, ACTIVE_CONFIG},
        error,
    },
    serde::de::DeserializeOwned,
};

mod probe;
mod server;
mod storage;

pub use {probe::*, server::*, storage::*};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub probe: ProbeConfig,
    pub storage: StorageConfig,
    /// Built-in chain table. Not read from the environment; tests swap it
    /// to point public endpoints at local mock servers.
    pub chains: Vec<ChainConfig>,
}

impl Config {
    pub fn from_env() -> error::ResolverResult<Config> {
        Ok(Self {
            server: from_env("RPC_RESOLVER_")?,
            probe: from_env("RPC_RESOLVER_PROBE_")?,
            storage: from_env("RPC_RESOLVER_STORAGE_")?,
            chains: ACTIVE_CONFIG.chains.clone(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            probe: ProbeConfig::default(),
            storage: StorageConfig::default(),
            chains: ACTIVE_CONFIG.chains.clone(),
        }
    }
}

fn from_env<T: DeserializeOwned>(prefix: &str) -> Result<T, envy::Error> {
    envy::prefixed(prefix).from_env()
}
