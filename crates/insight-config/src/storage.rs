use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the persisted key-value store
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new() -> Self {
        let data_dir = env::var("INSIGHT_DATA_DIR").unwrap_or_else(|_| "insight-data".to_string());

        Self {
            data_dir: PathBuf::from(data_dir),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}
