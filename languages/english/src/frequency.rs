use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use insight_core::language::FrequencyProvider;
use insight_core::storage::{Storage, StorageExt, StorageKey};
use insight_dictionary::{LemmaData, RankList};
use tokio::sync::Mutex;

/// English word frequency model: rank table, lemma table and ignore set
#[derive(Debug, Default)]
pub struct FrequencyModel {
    ranks: HashMap<String, u32>,
    lemmas: HashMap<String, String>,
    ignored: HashSet<String>,
    /// Bumped on every local change of the ignore set
    ignore_generation: u64,
    /// Generation of the ignore list last written to storage
    persisted: Arc<Mutex<u64>>,
}

impl FrequencyModel {
    /// Create an empty model; nothing qualifies until loaded
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(rank: &RankList, lemma: &LemmaData) -> Self {
        Self {
            ranks: rank.to_rank_map(),
            lemmas: lemma.to_variant_map(),
            ..Self::default()
        }
    }

    /// Load every empty table from storage.
    ///
    /// Tables already populated are left alone. Missing or corrupt data keeps
    /// the table empty.
    pub async fn load(&mut self, storage: &dyn Storage) {
        if self.ignored.is_empty() {
            match storage.get_typed::<Vec<String>>(StorageKey::IgnoreWord).await {
                Ok(Some(words)) => self.ignored = words.into_iter().collect(),
                Ok(None) => tracing::warn!("No ignore list in storage"),
                Err(e) => tracing::warn!("Failed to load ignore list: {}", e),
            }
        }

        if self.ranks.is_empty() {
            match storage.get_typed::<RankList>(StorageKey::Rank).await {
                Ok(Some(list)) => {
                    self.ranks = list.to_rank_map();
                    tracing::info!("Loaded {} ranked words", self.ranks.len());
                }
                Ok(None) => tracing::warn!("No rank data in storage"),
                Err(e) => tracing::warn!("Failed to load rank data: {}", e),
            }
        }

        if self.lemmas.is_empty() {
            match storage.get_typed::<LemmaData>(StorageKey::Lemma).await {
                Ok(Some(data)) => {
                    self.lemmas = data.to_variant_map();
                    tracing::info!("Loaded {} lemma variants", self.lemmas.len());
                }
                Ok(None) => tracing::warn!("No lemma data in storage"),
                Err(e) => tracing::warn!("Failed to load lemma data: {}", e),
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        !self.ranks.is_empty()
    }

    /// Percentile of a lemma, 0 when the table is empty or the lemma is ignored
    pub fn rank_percentile(&self, lemma: &str) -> u8 {
        if self.ignored.contains(lemma) {
            tracing::trace!("found ignored word: {}", lemma);
            return 0;
        }

        FrequencyProvider::percentile(self, lemma)
    }

    /// The word itself when ranked, else its canonical form
    pub fn resolve_lemma(&self, word: &str) -> Option<&str> {
        if let Some((ranked, _)) = self.ranks.get_key_value(word) {
            return Some(ranked.as_str());
        }

        self.variant_lemma(word)
    }

    /// Lemma table lookup only
    pub fn variant_lemma(&self, word: &str) -> Option<&str> {
        self.lemmas.get(word).map(String::as_str)
    }

    pub fn is_ignored(&self, lemma: &str) -> bool {
        self.ignored.contains(lemma)
    }

    /// Sorted snapshot of the ignore set
    pub fn ignored_words(&self) -> Vec<String> {
        let mut words: Vec<String> = self.ignored.iter().cloned().collect();
        words.sort();
        words
    }

    /// Never highlight `lemma` again; persisted in the background.
    ///
    /// Returns false when it was already ignored.
    pub fn ignore(&mut self, lemma: &str, storage: Arc<dyn Storage>) -> bool {
        tracing::info!("ignore word {}", lemma);
        if !self.ignored.insert(lemma.to_string()) {
            return false;
        }

        self.persist_ignored(storage);
        true
    }

    pub fn unignore(&mut self, lemma: &str, storage: Arc<dyn Storage>) -> bool {
        tracing::info!("unignore word {}", lemma);
        if !self.ignored.remove(lemma) {
            return false;
        }

        self.persist_ignored(storage);
        true
    }

    /// Replace the ignore set from a change notification
    pub fn replace_ignored(&mut self, words: Vec<String>) {
        tracing::debug!("update ignore data ({} words)", words.len());
        self.ignored = words.into_iter().collect();
    }

    /// Write the current list from a spawned task.
    ///
    /// Writers take turns on `persisted`; a snapshot older than the one
    /// already written is dropped, so storage never goes back in time.
    fn persist_ignored(&mut self, storage: Arc<dyn Storage>) {
        self.ignore_generation += 1;
        let generation = self.ignore_generation;
        let words = self.ignored_words();
        let persisted = self.persisted.clone();

        tokio::spawn(async move {
            let mut written = persisted.lock().await;
            if *written > generation {
                tracing::debug!("skip stale ignore list #{}", generation);
                return;
            }
            match storage.set_typed(StorageKey::IgnoreWord, &words).await {
                Ok(()) => *written = generation,
                Err(e) => tracing::warn!("Failed to persist ignore list: {}", e),
            }
        });
    }
}

impl FrequencyProvider for FrequencyModel {
    fn rank(&self, word: &str) -> Option<u32> {
        self.ranks.get(word).copied()
    }

    fn table_size(&self) -> usize {
        self.ranks.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use insight_core::storage::MemoryStorage;
    use serde_json::json;

    use super::*;

    fn seeded_storage() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.set(StorageKey::Rank, Some(json!(["the", "be", "to", "run"])));
        storage.set(StorageKey::Lemma, Some(json!([["run", ["running", "ran"]]])));
        storage.set(StorageKey::IgnoreWord, Some(json!(["be"])));
        storage
    }

    #[tokio::test]
    async fn load_populates_tables() {
        let storage = seeded_storage();
        let mut model = FrequencyModel::new();
        model.load(&storage).await;

        assert!(model.is_loaded());
        assert_eq!(model.rank("run"), Some(4));
        assert_eq!(model.resolve_lemma("running"), Some("run"));
        assert!(model.is_ignored("be"));
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let storage = seeded_storage();
        let mut model = FrequencyModel::new();
        model.load(&storage).await;

        storage.set(StorageKey::Rank, Some(json!(["other"])));
        model.load(&storage).await;
        assert_eq!(model.table_size(), 4);
    }

    #[tokio::test]
    async fn missing_or_corrupt_data_leaves_tables_empty() {
        let storage = MemoryStorage::new();
        storage.set(StorageKey::Lemma, Some(json!("garbage")));

        let mut model = FrequencyModel::new();
        model.load(&storage).await;

        assert!(!model.is_loaded());
        assert_eq!(model.rank_percentile("the"), 0);
        assert_eq!(model.resolve_lemma("running"), None);
    }

    #[test]
    fn ranked_word_is_its_own_lemma() {
        let rank = RankList(vec!["run".into(), "running".into()]);
        let lemma = LemmaData(vec![insight_dictionary::LemmaGroup(
            "run".into(),
            vec!["running".into()],
        )]);
        let model = FrequencyModel::from_tables(&rank, &lemma);

        assert_eq!(model.resolve_lemma("running"), Some("running"));
        assert_eq!(model.variant_lemma("running"), Some("run"));
        assert_eq!(model.resolve_lemma("walked"), None);
    }

    #[tokio::test]
    async fn ignore_round_trip_restores_percentile() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let rank = RankList(vec!["the".into(), "be".into(), "to".into()]);
        let mut model = FrequencyModel::from_tables(&rank, &LemmaData::default());

        let before = model.rank_percentile("to");
        assert_eq!(before, 100);

        assert!(model.ignore("to", storage.clone()));
        assert!(!model.ignore("to", storage.clone()));
        assert_eq!(model.rank_percentile("to"), 0);

        assert!(model.unignore("to", storage.clone()));
        assert_eq!(model.rank_percentile("to"), before);
    }

    #[tokio::test]
    async fn ignore_is_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let rx = storage.watch(StorageKey::IgnoreWord);

        let mut model = FrequencyModel::new();
        model.ignore("zebra", storage.clone());
        model.ignore("apple", storage.clone());

        let mut last = None;
        while let Ok(Ok(change)) = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await {
            last = change.new_value;
        }
        assert_eq!(last, Some(json!(["apple", "zebra"])));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn rapid_ignores_persist_the_latest_list() {
        let words = ["apple", "bison", "camel", "dingo", "eagle", "finch"];

        for _ in 0..50 {
            let storage = Arc::new(MemoryStorage::new());
            let mut model = FrequencyModel::new();
            for word in words {
                model.ignore(word, storage.clone());
            }

            let expected = json!(words);
            tokio::time::timeout(Duration::from_secs(2), async {
                while storage.get(StorageKey::IgnoreWord).as_ref() != Some(&expected) {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            })
            .await
            .expect("latest list persisted");

            // older snapshots still in flight must not overwrite it
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert_eq!(storage.get(StorageKey::IgnoreWord), Some(expected));
        }
    }
}
