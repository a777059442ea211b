use std::collections::HashMap;

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StorageError;

/// Named keys of the extension's key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Mode,
    SiteMode,
    Percent,
    IgnoreWord,
    Preference,
    Rank,
    Lemma,
}

impl StorageKey {
    pub const ALL: [StorageKey; 7] = [
        StorageKey::Mode,
        StorageKey::SiteMode,
        StorageKey::Percent,
        StorageKey::IgnoreWord,
        StorageKey::Preference,
        StorageKey::Rank,
        StorageKey::Lemma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Mode => "local:mode",
            StorageKey::SiteMode => "local:site-mode",
            StorageKey::Percent => "local:percent",
            StorageKey::IgnoreWord => "local:ignore-word",
            StorageKey::Preference => "local:preference",
            StorageKey::Rank => "local:rank",
            StorageKey::Lemma => "local:lemma",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

/// Delivered to watchers after a key changes
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    pub key: StorageKey,
    pub new_value: Option<Value>,
    pub old_value: Option<Value>,
}

/// Dropping the receiver detaches the watcher
pub type StorageWatch = AsyncReceiver<StorageChange>;

/// Persistent key-value storage with change notification
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_item(&self, key: StorageKey) -> Result<Option<Value>, StorageError>;

    /// `None` removes the key
    async fn set_item(&self, key: StorageKey, value: Option<Value>) -> Result<(), StorageError>;

    fn watch(&self, key: StorageKey) -> StorageWatch;
}

/// Typed access on top of [`Storage`]
#[async_trait]
pub trait StorageExt: Storage {
    /// Decode a value; a stored value of the wrong shape is an error
    async fn get_typed<T: DeserializeOwned + Send>(
        &self,
        key: StorageKey,
    ) -> Result<Option<T>, StorageError> {
        match self.get_item(key).await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    async fn set_typed<T: Serialize + Sync>(
        &self,
        key: StorageKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let value = serde_json::to_value(value)?;
        self.set_item(key, Some(value)).await
    }
}

impl<S: Storage + ?Sized> StorageExt for S {}

/// In-process storage; also the backing map of file-based stores
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<StorageKey, Value>>,
    watchers: Mutex<HashMap<StorageKey, Vec<AsyncSender<StorageChange>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: HashMap<StorageKey, Value>) -> Self {
        Self {
            items: RwLock::new(items),
            watchers: Mutex::new(HashMap::new()),
        }
    }

    pub fn snapshot(&self) -> HashMap<StorageKey, Value> {
        self.items.read().clone()
    }

    /// Number of attached watchers for `key`, detached ones included until the next change
    pub fn watcher_count(&self, key: StorageKey) -> usize {
        self.watchers.lock().get(&key).map_or(0, Vec::len)
    }

    pub fn get(&self, key: StorageKey) -> Option<Value> {
        self.items.read().get(&key).cloned()
    }

    /// Store a value and notify watchers; returns whether it changed
    pub fn set(&self, key: StorageKey, value: Option<Value>) -> bool {
        let old_value = {
            let mut items = self.items.write();
            match &value {
                Some(v) => items.insert(key, v.clone()),
                None => items.remove(&key),
            }
        };

        if old_value == value {
            return false;
        }

        let change = StorageChange {
            key,
            new_value: value,
            old_value,
        };

        let mut watchers = self.watchers.lock();
        if let Some(senders) = watchers.get_mut(&key) {
            senders.retain(|tx| tx.try_send(change.clone()).is_ok());
        }

        true
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: StorageKey) -> Result<Option<Value>, StorageError> {
        Ok(self.get(key))
    }

    async fn set_item(&self, key: StorageKey, value: Option<Value>) -> Result<(), StorageError> {
        if self.set(key, value) {
            tracing::debug!("storage {} changed", key.as_str());
        }
        Ok(())
    }

    fn watch(&self, key: StorageKey) -> StorageWatch {
        let (tx, rx) = kanal::unbounded_async();
        self.watchers.lock().entry(key).or_default().push(tx);
        rx
    }
}
