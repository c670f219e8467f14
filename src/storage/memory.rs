use {
    crate::storage::{deserialize, serialize, Data, KeyValueStorage, StorageResult},
    async_trait::async_trait,
    moka::future::Cache,
    serde::{de::DeserializeOwned, Serialize},
    std::fmt::Debug,
};

const MAX_ENTRIES: u64 = 1_024;

/// Process-local store. Used when no durable backend is configured and in
/// tests.
#[derive(Clone)]
pub struct MemoryStorage {
    cache: Cache<String, Data>,
}

impl Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage").finish()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            cache: Cache::new(MAX_ENTRIES),
        }
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T> KeyValueStorage<T> for MemoryStorage
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn get(&self, key: &str) -> StorageResult<Option<T>> {
        match self.cache.get(key).await {
            Some(data) => Ok(Some(deserialize(&data)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &T) -> StorageResult<()> {
        let data = serialize(value)?;
        self.cache.insert(key.to_string(), data).await;
        Ok(())
    }

    async fn del(&self, key: &str) -> StorageResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}
