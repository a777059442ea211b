use std::sync::Arc;

use insight_config::Config;
use insight_core::messaging::Messenger;
use insight_core::settings::Settings;
use insight_core::storage::Storage;
use insight_lang_english::FrequencyModel;
use insight_translator::{TranslationCache, TranslationProvider};
use tokio::sync::RwLock;

/// Everything one page shares between its event loop and watcher tasks
pub struct PageState {
    pub config: Config,
    pub host: String,
    pub settings: RwLock<Settings>,
    pub frequency: RwLock<FrequencyModel>,
    pub translations: TranslationCache,
    pub storage: Arc<dyn Storage>,
    pub messenger: Arc<dyn Messenger>,
}

impl PageState {
    pub fn new(
        config: Config,
        host: &str,
        storage: Arc<dyn Storage>,
        messenger: Arc<dyn Messenger>,
        provider: Arc<dyn TranslationProvider>,
    ) -> Self {
        Self {
            config,
            host: host.to_string(),
            settings: RwLock::new(Settings::default()),
            frequency: RwLock::new(FrequencyModel::new()),
            translations: TranslationCache::new(provider),
            storage,
            messenger,
        }
    }
}
