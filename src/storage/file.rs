use {
    crate::storage::{deserialize, serialize, KeyValueStorage, StorageResult},
    async_trait::async_trait,
    serde::{de::DeserializeOwned, Serialize},
    std::{
        io::ErrorKind,
        path::{Path, PathBuf},
    },
    tokio::fs,
};

/// One file per key under a data directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written record.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.msgpack"))
    }
}

#[async_trait]
impl<T> KeyValueStorage<T> for FileStorage
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn get(&self, key: &str) -> StorageResult<Option<T>> {
        match fs::read(self.path_for(key)).await {
            Ok(data) => Ok(Some(deserialize(&data)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &T) -> StorageResult<()> {
        let data = serialize(value)?;
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&tmp, &data).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
