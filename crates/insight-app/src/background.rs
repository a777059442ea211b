use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use insight_config::translation::TranslationConfig;
use insight_core::error::{MessageError, StorageError};
use insight_core::messaging::Messenger;
use insight_core::settings::DEFAULT_FILTER_PERCENT;
use insight_core::storage::{Storage, StorageExt, StorageKey};
use insight_dictionary::{LemmaData, RankList, TranslationData};
use insight_translator::{TranslateError, TranslationProvider};
use insight_types::{GlobalMode, SiteMode, is_supported};
use kanal::{AsyncReceiver, AsyncSender};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

/// Shared service behind every page: translation table, per-site modes and
/// injected style sheets.
pub struct Background {
    storage: Arc<dyn Storage>,
    config: TranslationConfig,
    translations: RwLock<HashMap<String, String>>,
    translations_ready: watch::Sender<bool>,
    site_modes: RwLock<HashMap<String, SiteMode>>,
    subscribers: Mutex<HashMap<String, Vec<AsyncSender<SiteMode>>>>,
    styles: Mutex<Vec<String>>,
}

impl Background {
    pub fn new(storage: Arc<dyn Storage>, config: TranslationConfig) -> Self {
        let (translations_ready, _) = watch::channel(false);

        Self {
            storage,
            config,
            translations: RwLock::new(HashMap::new()),
            translations_ready,
            site_modes: RwLock::new(HashMap::new()),
            subscribers: Mutex::new(HashMap::new()),
            styles: Mutex::new(Vec::new()),
        }
    }

    /// Seed missing defaults and read the site-mode record
    pub async fn load(&self) -> Result<(), StorageError> {
        if self.storage.get_item(StorageKey::Percent).await?.is_none() {
            self.storage
                .set_typed(StorageKey::Percent, &DEFAULT_FILTER_PERCENT)
                .await?;
        }

        if self.storage.get_item(StorageKey::IgnoreWord).await?.is_none() {
            self.storage
                .set_typed(StorageKey::IgnoreWord, &Vec::<String>::new())
                .await?;
        }

        match self
            .storage
            .get_typed::<HashMap<String, SiteMode>>(StorageKey::SiteMode)
            .await
        {
            Ok(Some(record)) => *self.site_modes.write() = record,
            Ok(None) => {
                self.storage
                    .set_typed(StorageKey::SiteMode, &HashMap::<String, SiteMode>::new())
                    .await?;
            }
            Err(e) => tracing::warn!("Failed to read site modes, starting empty: {}", e),
        }

        if self.storage.get_item(StorageKey::Mode).await?.is_none() {
            self.storage
                .set_typed(StorageKey::Mode, &GlobalMode::Enable)
                .await?;
        }

        tracing::info!(
            "Background loaded with {} site overrides",
            self.site_modes.read().len()
        );
        Ok(())
    }

    /// Write the word lists every page reads on startup
    pub async fn install(&self, rank: &RankList, lemma: &LemmaData) -> Result<(), StorageError> {
        self.storage.set_typed(StorageKey::Rank, rank).await?;
        self.storage.set_typed(StorageKey::Lemma, lemma).await?;
        tracing::info!("Installed {} ranked words and {} lemma groups", rank.len(), lemma.0.len());
        Ok(())
    }

    /// Replace the translation table and release waiting lookups
    pub fn load_translations(&self, data: TranslationData) {
        let map = data.into_map();
        tracing::info!("Loaded {} translations", map.len());
        *self.translations.write() = map;
        self.translations_ready.send_replace(true);
    }

    pub fn site_mode(&self, host: &str) -> SiteMode {
        self.site_modes.read().get(host).copied().unwrap_or_default()
    }

    /// Style sheets currently applied, in injection order
    pub fn styles(&self) -> Vec<String> {
        self.styles.lock().clone()
    }

    async fn global_mode(&self) -> GlobalMode {
        match self.storage.get_typed::<GlobalMode>(StorageKey::Mode).await {
            Ok(mode) => mode.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Failed to read global mode: {}", e);
                GlobalMode::default()
            }
        }
    }
}

#[async_trait]
impl Messenger for Background {
    async fn get_site_mode(&self, host: &str) -> Result<SiteMode, MessageError> {
        tracing::debug!("getSiteMode {}", host);
        Ok(self.site_mode(host))
    }

    async fn set_site_mode(&self, host: &str, mode: SiteMode) -> Result<(), MessageError> {
        tracing::debug!("setSiteMode {} {}", host, mode);
        let record = {
            let mut site_modes = self.site_modes.write();
            if site_modes.get(host) == Some(&mode) {
                return Ok(());
            }
            site_modes.insert(host.to_string(), mode);
            site_modes.clone()
        };

        self.storage.set_typed(StorageKey::SiteMode, &record).await?;

        if let Some(senders) = self.subscribers.lock().get_mut(host) {
            senders.retain(|tx| tx.try_send(mode).is_ok());
        }
        Ok(())
    }

    async fn is_supported(&self, host: &str) -> Result<bool, MessageError> {
        let mode = self.global_mode().await;
        let site_mode = self.site_mode(host);
        tracing::debug!("isSupported {} mode={} site_mode={}", host, mode, site_mode);
        Ok(is_supported(mode, site_mode))
    }

    fn subscribe_site_mode(&self, host: &str) -> AsyncReceiver<SiteMode> {
        let (tx, rx) = kanal::unbounded_async();
        self.subscribers
            .lock()
            .entry(host.to_string())
            .or_default()
            .push(tx);
        rx
    }

    async fn inject_css(&self, css: &str) -> Result<(), MessageError> {
        self.styles.lock().push(css.to_string());
        Ok(())
    }

    async fn remove_css(&self, css: &str) -> Result<(), MessageError> {
        let mut styles = self.styles.lock();
        if let Some(pos) = styles.iter().position(|s| s == css) {
            styles.remove(pos);
        }
        Ok(())
    }

    async fn replace_css(&self, old: &str, css: &str) -> Result<(), MessageError> {
        let mut styles = self.styles.lock();
        match styles.iter().position(|s| s == old) {
            Some(pos) => styles[pos] = css.to_string(),
            None => styles.push(css.to_string()),
        }
        Ok(())
    }
}

#[async_trait]
impl TranslationProvider for Background {
    /// Answers every requested word, `""` when unknown.
    ///
    /// Waits up to `wait_ms` for the table to finish loading, then answers
    /// with whatever is there.
    async fn translate_words(
        &self,
        words: &[String],
    ) -> Result<HashMap<String, String>, TranslateError> {
        let mut ready = self.translations_ready.subscribe();
        let wait = Duration::from_millis(self.config.wait_ms);
        let loaded = tokio::time::timeout(wait, ready.wait_for(|loaded| *loaded))
            .await
            .is_ok();
        if !loaded {
            tracing::debug!("translation table not ready after {}ms", self.config.wait_ms);
        }

        let translations = self.translations.read();
        Ok(words
            .iter()
            .map(|word| {
                let text = translations.get(word).cloned().unwrap_or_default();
                (word.clone(), text)
            })
            .collect())
    }
}
