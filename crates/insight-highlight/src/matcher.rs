use insight_core::language::{Classification, WordClassifier};
use insight_types::MatchSpan;
use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of ASCII word characters
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("valid token pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub surface: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Word-like tokens of `text`, left to right, original case
pub fn tokenize(text: &str) -> impl Iterator<Item = Token<'_>> {
    TOKEN_RE.find_iter(text).map(|m| Token {
        surface: m.as_str(),
        start: m.start(),
        end: m.end(),
    })
}

/// Cheap pre-filter applied before matching a text run.
///
/// Skips short runs and runs that look like inline structured data.
pub fn should_scan(text: &str, min_len: usize) -> bool {
    if text.chars().count() <= min_len {
        return false;
    }

    !(text.contains('{') && text.contains('}'))
}

/// Ordered, non-overlapping spans of the tokens that qualify
pub fn find_matches(text: &str, classifier: &dyn WordClassifier, filter_percent: u8) -> Vec<MatchSpan> {
    tokenize(text)
        .filter_map(|token| match classifier.classify(token.surface, filter_percent) {
            Classification::Qualified { percentile, lemma } => Some(MatchSpan {
                start: token.start,
                end: token.end,
                text: token.surface.to_string(),
                percentile,
                lemma,
            }),
            Classification::Rejected => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use insight_dictionary::{LemmaData, LemmaGroup, RankList};
    use insight_lang_english::FrequencyModel;
    use proptest::prelude::*;

    use super::*;

    fn model() -> FrequencyModel {
        let rank = RankList(
            ["the", "be", "to", "of", "cat", "run", "ocean", "whale", "krill", "plankton"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        );
        let lemma = LemmaData(vec![
            LemmaGroup("cat".into(), vec!["cats".into()]),
            LemmaGroup("run".into(), vec!["running".into(), "ran".into()]),
        ]);
        FrequencyModel::from_tables(&rank, &lemma)
    }

    #[test]
    fn tokens_keep_offsets_and_case() {
        let tokens: Vec<_> = tokenize("Hi, snake_case x2!").collect();
        assert_eq!(
            tokens,
            vec![
                Token { surface: "Hi", start: 0, end: 2 },
                Token { surface: "snake_case", start: 4, end: 14 },
                Token { surface: "x2", start: 15, end: 17 },
            ]
        );
    }

    #[test]
    fn non_ascii_letters_split_tokens() {
        let tokens: Vec<_> = tokenize("café whale").map(|t| t.surface).collect();
        assert_eq!(tokens, vec!["caf", "whale"]);
    }

    #[test]
    fn spans_carry_original_text() {
        let spans = find_matches("Whales were Running near the Krill.", &model(), 50);
        let found: Vec<_> = spans
            .iter()
            .map(|s| (s.text.as_str(), s.lemma.as_str(), s.percentile))
            .collect();
        assert_eq!(found, vec![("Running", "run", 60), ("Krill", "krill", 90)]);

        let running = &spans[0];
        assert_eq!(
            &"Whales were Running near the Krill."[running.start..running.end],
            "Running"
        );
    }

    #[test]
    fn pre_filter() {
        assert!(!should_scan("cat", 3));
        assert!(!should_scan("été", 3));
        assert!(should_scan("cats", 3));
        assert!(!should_scan(r#"{"plankton": 1}"#, 3));
        assert!(should_scan("only { opening", 3));
    }

    proptest! {
        #[test]
        fn spans_are_ordered_and_disjoint(text in "[a-zA-Z ,.!-]{0,80}", threshold in 0u8..=100) {
            let spans = find_matches(&text, &model(), threshold);
            for pair in spans.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
            for span in &spans {
                prop_assert_eq!(&text[span.start..span.end], span.text.as_str());
                prop_assert!(span.percentile >= threshold);
            }
        }
    }
}
