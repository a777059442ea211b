use serde::{Deserialize, Serialize};

fn default_wait_ms() -> u64 {
    500
}

fn default_fallback_text() -> String {
    "Click to open Google Translate".to_string()
}

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "zh".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslationConfig {
    /// How long a lookup waits for the translation table to finish loading
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,
    /// Shown in the popup when no translation is known
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_wait_ms(),
            fallback_text: default_fallback_text(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
        }
    }
}
