use {
    crate::storage::redis::RedisAddr,
    serde::Deserialize,
    serde_piecewise_default::DeserializePiecewiseDefault,
    std::{fmt, path::PathBuf},
};

#[derive(DeserializePiecewiseDefault, Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Key the preference record is stored under.
    pub storage_name: String,
    /// Stored records with another version are discarded on load.
    pub schema_version: u32,
    pub data_dir: Option<PathBuf>,
    pub redis_max_connections: usize,
    pub redis_addr_read: Option<String>,
    pub redis_addr_write: Option<String>,
    pub redis_key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_name: "rpc-resolver.preferences".to_string(),
            schema_version: 1,
            data_dir: None,
            redis_max_connections: 8,
            redis_addr_read: None,
            redis_addr_write: None,
            redis_key_prefix: "rpc-resolver".to_string(),
        }
    }
}

/// Where preferences are kept. Redis wins over a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Redis(RedisAddr),
    File(PathBuf),
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redis(_) => f.write_str("redis"),
            Self::File(_) => f.write_str("file"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

impl StorageConfig {
    pub fn backend(&self) -> StorageBackend {
        if let Some(addr) = RedisAddr::from_config(
            self.redis_addr_read.as_deref(),
            self.redis_addr_write.as_deref(),
        ) {
            return StorageBackend::Redis(addr);
        }
        match &self.data_dir {
            Some(dir) => StorageBackend::File(dir.clone()),
            None => StorageBackend::Memory,
        }
    }
}
