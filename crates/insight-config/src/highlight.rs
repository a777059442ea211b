use serde::{Deserialize, Serialize};

fn default_tag() -> String {
    "insight-word".to_string()
}

fn default_class() -> String {
    "insight-word-highlight".to_string()
}

fn default_ignore_class() -> String {
    "insight-word-ignore".to_string()
}

fn default_enable_class() -> String {
    "insight-word-enable".to_string()
}

/// Parent tags whose text children are worth scanning
fn default_allowed_tags() -> Vec<String> {
    [
        "P", "H1", "H2", "H3", "H4", "H5", "H6", "B", "SMALL", "STRONG", "Q", "DIV", "SPAN", "EM",
        "A", "SUMMARY",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_min_text_len() -> usize {
    3
}

fn default_max_matches() -> usize {
    10_000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HighlightConfig {
    /// Tag name of created highlight elements
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Base class, present iff the word is in range
    #[serde(default = "default_class")]
    pub class: String,
    /// Marks the engine's own UI so it is never scanned
    #[serde(default = "default_ignore_class")]
    pub ignore_class: String,
    /// Body class gating all highlight CSS
    #[serde(default = "default_enable_class")]
    pub enable_class: String,
    #[serde(default = "default_allowed_tags")]
    pub allowed_tags: Vec<String>,
    /// Text runs with at most this many characters are skipped
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,
    /// A scan stops once it has produced more matches than this
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,
}

impl HighlightConfig {
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            class: default_class(),
            ignore_class: default_ignore_class(),
            enable_class: default_enable_class(),
            allowed_tags: default_allowed_tags(),
            min_text_len: default_min_text_len(),
            max_matches: default_max_matches(),
        }
    }
}
