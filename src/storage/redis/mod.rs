use {
    crate::storage::{deserialize, serialize, KeyValueStorage, StorageError, StorageResult},
    async_trait::async_trait,
    deadpool_redis::{
        redis::{AsyncCommands, RedisError},
        Config,
        Connection,
        Pool,
        PoolError,
    },
    serde::{de::DeserializeOwned, Serialize},
    std::fmt::Debug,
};

/// Where reads and writes go. Deployments with a replica read from it and
/// write to the primary; otherwise both point at the same server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisAddr {
    pub read: String,
    pub write: String,
}

impl RedisAddr {
    /// `None` when neither address is configured.
    pub fn from_config(read: Option<&str>, write: Option<&str>) -> Option<Self> {
        let (read, write) = match (read, write) {
            (None, None) => return None,
            (Some(read), Some(write)) => (read, write),
            (Some(addr), None) | (None, Some(addr)) => (addr, addr),
        };
        Some(Self {
            read: read.to_string(),
            write: write.to_string(),
        })
    }
}

/// Records live under `<prefix>:<key>` so several resolvers can share one
/// server.
#[derive(Clone)]
pub struct Redis {
    read_pool: Pool,
    write_pool: Pool,
    prefix: String,
}

impl Debug for Redis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Redis")
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl Redis {
    pub fn new(addr: &RedisAddr, pool_size: usize, prefix: &str) -> StorageResult<Self> {
        let pool = |url: &str| {
            Config::from_url(url)
                .builder()
                .map_err(|e| StorageError::Other(format!("{e}")))?
                .max_size(pool_size)
                .build()
                .map_err(|e| StorageError::Other(format!("{e}")))
        };

        Ok(Self {
            read_pool: pool(&addr.read)?,
            write_pool: pool(&addr.write)?,
            prefix: prefix.to_string(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{key}", self.prefix)
    }

    async fn reader(&self) -> StorageResult<Connection> {
        self.read_pool.get().await.map_err(pool_error)
    }

    async fn writer(&self) -> StorageResult<Connection> {
        self.write_pool.get().await.map_err(pool_error)
    }
}

fn pool_error(e: PoolError) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Network trouble is reported as `Connection` so callers can tell it apart
/// from a record that is present but broken.
fn command_error(e: RedisError) -> StorageError {
    if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
    {
        StorageError::Connection(e.to_string())
    } else {
        StorageError::Other(e.to_string())
    }
}

#[async_trait]
impl<T> KeyValueStorage<T> for Redis
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn get(&self, key: &str) -> StorageResult<Option<T>> {
        let data: Option<Vec<u8>> = self
            .reader()
            .await?
            .get(self.key(key))
            .await
            .map_err(command_error)?;

        data.map(|data| deserialize(&data)).transpose()
    }

    async fn set(&self, key: &str, value: &T) -> StorageResult<()> {
        let data = serialize(value)?;
        self.writer()
            .await?
            .set::<_, _, ()>(self.key(key), data)
            .await
            .map_err(command_error)
    }

    async fn del(&self, key: &str) -> StorageResult<()> {
        self.writer()
            .await?
            .del::<_, ()>(self.key(key))
            .await
            .map_err(command_error)
    }
}
