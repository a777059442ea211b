use std::path::Path;

use serde::de::DeserializeOwned;

use crate::types::{LemmaData, LoadError, RankList, TranslationData};

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.display().to_string()));
    }

    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Load a JSON array of words ordered by frequency
pub fn load_rank_file(path: &Path) -> Result<RankList, LoadError> {
    tracing::info!("Loading rank list from file: {}", path.display());
    let list: RankList = load_json(path)?;
    tracing::info!("Loaded {} ranked words", list.len());
    Ok(list)
}

/// Load a JSON array of `[canonical, [variants]]`
pub fn load_lemma_file(path: &Path) -> Result<LemmaData, LoadError> {
    tracing::info!("Loading lemma data from file: {}", path.display());
    let data: LemmaData = load_json(path)?;
    tracing::info!("Loaded {} lemma groups", data.0.len());
    Ok(data)
}

/// Load a JSON array of `[word, translation]`
pub fn load_translation_file(path: &Path) -> Result<TranslationData, LoadError> {
    tracing::info!("Loading translations from file: {}", path.display());
    let data: TranslationData = load_json(path)?;
    tracing::info!("Loaded {} translations", data.0.len());
    Ok(data)
}
