/// Word frequency data
pub trait FrequencyProvider: Send + Sync {
    /// 1-based rank (lower = more common), None if not in list
    fn rank(&self, word: &str) -> Option<u32>;

    /// Number of ranked words
    fn table_size(&self) -> usize;

    /// Rank expressed as a 0-100 position within the table.
    ///
    /// Words missing from the table count as rank 0, so they never qualify.
    fn percentile(&self, word: &str) -> u8 {
        let size = self.table_size();
        if size == 0 {
            return 0;
        }

        let rank = self.rank(word).unwrap_or(0);
        to_percent(rank as f64 / size as f64)
    }
}

/// Map a 0-1 fraction onto 0-100, rounding up
pub fn to_percent(value: f64) -> u8 {
    (value * 100.0).clamp(0.0, 100.0).ceil() as u8
}

/// Match decision for a single token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Rejected,
    Qualified { percentile: u8, lemma: String },
}

impl Classification {
    pub fn qualifies(&self) -> bool {
        matches!(self, Classification::Qualified { .. })
    }
}

/// Decides which tokens get highlighted
pub trait WordClassifier: Send + Sync {
    /// Classify a raw, original-case token against the threshold
    fn classify(&self, token: &str, filter_percent: u8) -> Classification;

    /// Current percentile of a lemma, 0 when ignored or unknown
    fn percentile(&self, lemma: &str) -> u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<&'static str>);

    impl FrequencyProvider for Fixed {
        fn rank(&self, word: &str) -> Option<u32> {
            self.0.iter().position(|w| *w == word).map(|i| i as u32 + 1)
        }

        fn table_size(&self) -> usize {
            self.0.len()
        }
    }

    #[test]
    fn percentile_rounds_up() {
        let table = Fixed(vec!["the", "be", "to"]);
        assert_eq!(table.percentile("the"), 34);
        assert_eq!(table.percentile("be"), 67);
        assert_eq!(table.percentile("to"), 100);
        assert_eq!(table.percentile("xyz"), 0);
    }

    #[test]
    fn empty_table_is_zero() {
        assert_eq!(Fixed(vec![]).percentile("the"), 0);
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(to_percent(-0.5), 0);
        assert_eq!(to_percent(0.5), 50);
        assert_eq!(to_percent(1.7), 100);
    }
}
