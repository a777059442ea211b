use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use insight_core::error::StorageError;
use insight_core::storage::{MemoryStorage, Storage, StorageKey, StorageWatch};
use serde_json::Value;
use tokio::sync::Mutex;

/// Key-value store persisted as one JSON object on disk.
///
/// Reads are served from memory; every change rewrites the file. Writes
/// take turns and each one snapshots the map after getting its turn, so the
/// file always ends at the latest state.
pub struct JsonFileStorage {
    path: PathBuf,
    inner: MemoryStorage,
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    /// Open the store at `path`, starting empty when the file does not exist yet
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let mut items = HashMap::new();

        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            let raw: BTreeMap<String, Value> = serde_json::from_str(&data)?;
            for (name, value) in raw {
                match StorageKey::parse(&name) {
                    Some(key) => {
                        items.insert(key, value);
                    }
                    None => tracing::warn!("Skipping unknown storage key {}", name),
                }
            }
            tracing::info!("Loaded {} storage items from {}", items.len(), path.display());
        } else {
            tracing::info!("No storage at {}, starting empty", path.display());
        }

        Ok(Self {
            path: path.to_path_buf(),
            inner: MemoryStorage::with_items(items),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let _turn = self.write_lock.lock().await;
        let raw: BTreeMap<&str, Value> = self
            .inner
            .snapshot()
            .into_iter()
            .map(|(key, value)| (key.as_str(), value))
            .collect();

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&raw)?).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn get_item(&self, key: StorageKey) -> Result<Option<Value>, StorageError> {
        Ok(self.inner.get(key))
    }

    async fn set_item(&self, key: StorageKey, value: Option<Value>) -> Result<(), StorageError> {
        if self.inner.set(key, value) {
            tracing::debug!("storage {} changed, writing {}", key.as_str(), self.path.display());
            self.persist().await?;
        }
        Ok(())
    }

    fn watch(&self, key: StorageKey) -> StorageWatch {
        self.inner.watch(key)
    }
}
