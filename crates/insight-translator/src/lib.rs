use std::collections::HashMap;

pub mod cache;
pub mod fallback;

pub use cache::TranslationCache;
pub use fallback::fallback_url;

/// Marks "no translation" in the provider's data
pub const NO_TRANSLATION: &str = "NULL";

/// Word translation provider interface
#[async_trait::async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate a batch of lowercase words.
    ///
    /// The answer may omit words or map them to an empty string or
    /// [`NO_TRANSLATION`] when nothing is known.
    async fn translate_words(
        &self,
        words: &[String],
    ) -> Result<HashMap<String, String>, TranslateError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Provider unreachable: {0}")]
    Unreachable(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Provider error: {0}")]
    ProviderError(String),
}
