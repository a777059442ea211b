use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Words ordered from most to least frequent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankList(pub Vec<String>);

/// `[canonical, [variants]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaGroup(pub String, pub Vec<String>);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LemmaData(pub Vec<LemmaGroup>);

/// `[word, translation]` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationData(pub Vec<(String, String)>);

impl RankList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// word -> 1-based rank; a repeated word keeps its last position
    pub fn to_rank_map(&self) -> HashMap<String, u32> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, word)| (word.clone(), i as u32 + 1))
            .collect()
    }
}

impl LemmaData {
    /// Invert into variant -> canonical; later groups overwrite earlier ones
    pub fn to_variant_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for LemmaGroup(canonical, variants) in &self.0 {
            for variant in variants {
                map.insert(variant.clone(), canonical.clone());
            }
        }
        map
    }
}

impl TranslationData {
    pub fn into_map(self) -> HashMap<String, String> {
        self.0.into_iter().collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_one_based() {
        let list = RankList(vec!["the".into(), "be".into(), "to".into()]);
        let map = list.to_rank_map();
        assert_eq!(map["the"], 1);
        assert_eq!(map["to"], 3);
    }

    #[test]
    fn lemma_inversion_last_write_wins() {
        let data: LemmaData = serde_json::from_str(
            r#"[["run", ["running", "ran", "runs"]], ["rune", ["runs"]]]"#,
        )
        .unwrap();

        let map = data.to_variant_map();
        assert_eq!(map["running"], "run");
        assert_eq!(map["runs"], "rune");
        assert!(!map.contains_key("run"));
    }
}
