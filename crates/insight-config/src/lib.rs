use std::env;

use serde::{Deserialize, Serialize};

use self::highlight::HighlightConfig;
use self::scheduler::SchedulerConfig;
use self::storage::StorageConfig;
use self::translation::TranslationConfig;

pub mod highlight;
pub mod scheduler;
pub mod storage;
pub mod translation;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub highlight: HighlightConfig,
    pub scheduler: SchedulerConfig,
    pub translation: TranslationConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();

        if let Some(max_matches) = env_parse("INSIGHT_MAX_MATCHES") {
            config.highlight.max_matches = max_matches;
        }

        if let Some(delay) = env_parse("INSIGHT_DEFERRED_SCAN_MS") {
            config.scheduler.deferred_scan_ms = delay;
        }

        if let Some(wait) = env_parse("INSIGHT_TRANSLATION_WAIT_MS") {
            config.translation.wait_ms = wait;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
