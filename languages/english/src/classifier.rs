use insight_core::language::{Classification, WordClassifier};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::frequency::FrequencyModel;

/// Lowercase letters, optionally hyphenated, starting with a letter
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z-]*$").expect("valid word pattern"));

/// Whether a lowercased token can name an English word
pub fn is_word_like(lowercased: &str) -> bool {
    WORD_RE.is_match(lowercased)
}

impl WordClassifier for FrequencyModel {
    fn classify(&self, token: &str, filter_percent: u8) -> Classification {
        let lower = token.to_lowercase();
        if !is_word_like(&lower) {
            return Classification::Rejected;
        }

        let Some(lemma) = self.resolve_lemma(&lower) else {
            return Classification::Rejected;
        };

        let percentile = self.rank_percentile(lemma);
        if percentile < filter_percent {
            return Classification::Rejected;
        }

        Classification::Qualified {
            percentile,
            lemma: lemma.to_string(),
        }
    }

    fn percentile(&self, lemma: &str) -> u8 {
        self.rank_percentile(lemma)
    }
}
