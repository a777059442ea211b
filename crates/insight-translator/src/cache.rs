use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{NO_TRANSLATION, TranslationProvider};

fn usable(value: Option<&String>) -> Option<&String> {
    value.filter(|text| !text.is_empty() && text.as_str() != NO_TRANSLATION)
}

/// Page-lifetime memo of word translations.
///
/// Entries are never evicted. Words nobody could translate are not cached,
/// so a later hover asks the provider again.
pub struct TranslationCache {
    provider: Arc<dyn TranslationProvider>,
    entries: RwLock<HashMap<String, String>>,
}

impl TranslationCache {
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            provider,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cache-only lookup
    pub fn cached(&self, word: &str) -> Option<String> {
        self.entries.read().get(&word.to_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Translate `word`, falling back to its lemma as `"{lemma} | {translation}"`
    pub async fn get(&self, word: &str, lemma: Option<&str>) -> Option<String> {
        let word = word.to_lowercase();
        if let Some(hit) = self.cached(&word) {
            return Some(hit);
        }

        let lemma = lemma.filter(|l| !l.is_empty() && *l != word);
        let mut request = vec![word.clone()];
        request.extend(lemma.map(str::to_string));

        tracing::debug!("get translation from provider: {:?}", request);
        let response = match self.provider.translate_words(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Translation lookup for {} failed: {}", word, e);
                return None;
            }
        };

        let mut entries = self.entries.write();
        for (key, value) in &response {
            if let Some(text) = usable(Some(value)) {
                entries.insert(key.clone(), text.clone());
            }
        }

        if let Some(text) = usable(response.get(&word)) {
            return Some(text.clone());
        }

        let lemma = lemma?;
        let translation = usable(response.get(lemma))?;
        tracing::debug!("map translation {} => {}", word, translation);
        let text = format!("{lemma} | {translation}");
        entries.insert(word, text.clone());
        Some(text)
    }
}
