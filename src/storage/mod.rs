use {
    crate::storage::error::StorageError,
    async_trait::async_trait,
    serde::{de::DeserializeOwned, Serialize},
    std::fmt::Debug,
};

pub mod error;
pub mod file;
pub mod memory;
pub mod redis;

/// The Result type returned by Storage functions
pub type StorageResult<T> = Result<T, StorageError>;

/// A durable home for whole records keyed by name. Records are written and
/// replaced in one piece; there is no expiry.
#[async_trait]
pub trait KeyValueStorage<T>: 'static + Send + Sync + Debug
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// `Ok(None)` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> StorageResult<Option<T>>;

    /// Replaces whatever is stored under `key`.
    async fn set(&self, key: &str, value: &T) -> StorageResult<()>;

    /// Removing a missing key is not an error.
    async fn del(&self, key: &str) -> StorageResult<()>;
}

/// Holder the type of data will be serialized to be stored.
pub type Data = Vec<u8>;

/// Fields are written by name so records survive reordering between
/// schema versions.
pub fn serialize<T>(data: &T) -> StorageResult<Data>
where
    T: Serialize,
{
    rmp_serde::to_vec_named(data).map_err(|_| StorageError::Serialize)
}

pub fn deserialize<T>(data: &[u8]) -> StorageResult<T>
where
    T: DeserializeOwned,
{
    rmp_serde::from_slice(data).map_err(|_| StorageError::Deserialize)
}
