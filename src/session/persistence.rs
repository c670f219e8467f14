use {
    crate::{
        env::StorageConfig,
        registry::UserEndpointPreference,
        storage::{error::StorageError, KeyValueStorage, StorageResult},
    },
    serde::{Deserialize, Serialize},
    std::sync::Arc,
    tap::TapFallible,
    tokio::sync::{mpsc, oneshot},
    tracing::{debug, warn},
};

/// The single durable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPreference {
    pub version: u32,
    pub preference: UserEndpointPreference,
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    storage: Arc<dyn KeyValueStorage<StoredPreference>>,
    key: String,
    version: u32,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn KeyValueStorage<StoredPreference>>, config: &StorageConfig) -> Self {
        Self {
            storage,
            key: config.storage_name.clone(),
            version: config.schema_version,
        }
    }

    /// Falls back to defaults when nothing is stored or the store cannot be
    /// read. A record that does not decode or carries another schema version
    /// is also deleted; a read failure leaves the record in place.
    pub async fn load(&self) -> UserEndpointPreference {
        match self.storage.get(&self.key).await {
            Ok(Some(stored)) if stored.version == self.version => stored.preference,
            Ok(Some(stored)) => {
                warn!(
                    "discarding stored preference with schema version {} (expected {})",
                    stored.version, self.version
                );
                self.discard().await;
                UserEndpointPreference::default()
            }
            Ok(None) => UserEndpointPreference::default(),
            Err(e @ StorageError::Deserialize) => {
                warn!("discarding undecodable stored preference: {e}");
                self.discard().await;
                UserEndpointPreference::default()
            }
            Err(e) => {
                warn!("stored preference unavailable, using defaults: {e}");
                UserEndpointPreference::default()
            }
        }
    }

    pub async fn save(&self, preference: &UserEndpointPreference) -> StorageResult<()> {
        let record = StoredPreference {
            version: self.version,
            preference: preference.clone(),
        };
        self.storage.set(&self.key, &record).await
    }

    async fn discard(&self) {
        let _ = self
            .storage
            .del(&self.key)
            .await
            .tap_err(|e| warn!("failed to remove stored preference: {e}"));
    }
}

enum Command {
    Store(UserEndpointPreference),
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Background task writing preference snapshots in order. When several
/// snapshots queue up only the latest is written.
#[derive(Debug, Clone)]
pub struct PreferenceWriter {
    commands: mpsc::UnboundedSender<Command>,
}

impl PreferenceWriter {
    pub fn spawn(store: PreferenceStore) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(store, rx));
        Self { commands }
    }

    pub fn schedule(&self, preference: UserEndpointPreference) {
        if self.commands.send(Command::Store(preference)).is_err() {
            warn!("preference writer stopped, change not persisted");
        }
    }

    /// Resolves once every snapshot scheduled before the call reached the
    /// store.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Flushes and stops the task. Later writes are dropped.
    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(Command::Shutdown(tx)).is_ok() {
            let _ = rx.await;
        }
    }
}

async fn run_writer(store: PreferenceStore, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        let mut latest = None;
        let mut waiting = Vec::new();
        let mut stop = false;

        let mut next = Some(command);
        while let Some(command) = next {
            match command {
                Command::Store(preference) => latest = Some(preference),
                Command::Flush(ack) => waiting.push(ack),
                Command::Shutdown(ack) => {
                    waiting.push(ack);
                    stop = true;
                    break;
                }
            }
            next = rx.try_recv().ok();
        }

        if let Some(preference) = latest {
            let _ = store
                .save(&preference)
                .await
                .tap_ok(|_| debug!("preference persisted"))
                .tap_err(|e| warn!("failed to persist preference: {e}"));
        }
        for ack in waiting {
            let _ = ack.send(());
        }
        if stop {
            break;
        }
    }
    debug!("preference writer stopped");
}
