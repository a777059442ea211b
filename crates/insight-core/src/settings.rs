use insight_types::{GlobalMode, Preference, SiteMode, is_supported};

use crate::messaging::Messenger;
use crate::storage::{Storage, StorageExt, StorageKey};

pub const DEFAULT_FILTER_PERCENT: u8 = 30;

/// Current user settings for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub global_mode: GlobalMode,
    pub site_mode: SiteMode,
    pub filter_percent: u8,
    pub preference: Preference,
    enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            global_mode: GlobalMode::default(),
            site_mode: SiteMode::default(),
            filter_percent: DEFAULT_FILTER_PERCENT,
            preference: Preference::default(),
            enabled: true,
        }
    }
}

impl Settings {
    /// Read every setting, falling back to defaults for anything missing or unreadable
    pub async fn load(storage: &dyn Storage, messenger: &dyn Messenger, host: &str) -> Self {
        let mut settings = Settings::default();

        match storage.get_typed::<GlobalMode>(StorageKey::Mode).await {
            Ok(Some(mode)) => settings.global_mode = mode,
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read global mode: {}", e),
        }

        match messenger.get_site_mode(host).await {
            Ok(mode) => settings.site_mode = mode,
            Err(e) => tracing::warn!("Failed to get site mode for {}: {}", host, e),
        }

        match storage.get_typed::<u8>(StorageKey::Percent).await {
            Ok(value) => {
                settings.try_set_filter_percent(value);
            }
            Err(e) => tracing::warn!("Failed to read filter percent: {}", e),
        }

        match storage.get_typed::<Preference>(StorageKey::Preference).await {
            Ok(Some(preference)) => settings.preference = preference,
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read preference: {}", e),
        }

        settings.recompute_enable();
        tracing::info!(
            "Settings loaded: mode={} site_mode={} percent={} enabled={}",
            settings.global_mode,
            settings.site_mode,
            settings.filter_percent,
            settings.enabled
        );

        settings
    }

    /// Effective enable as of the last [`Settings::recompute_enable`]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Must be called after either mode changes
    pub fn recompute_enable(&mut self) -> bool {
        self.enabled = is_supported(self.global_mode, self.site_mode);
        self.enabled
    }

    pub fn set_global_mode(&mut self, mode: GlobalMode) -> bool {
        self.global_mode = mode;
        self.recompute_enable()
    }

    pub fn set_site_mode(&mut self, mode: SiteMode) -> bool {
        self.site_mode = mode;
        self.recompute_enable()
    }

    /// Apply a new threshold; `None` is rejected and leaves the state unchanged
    pub fn try_set_filter_percent(&mut self, value: Option<u8>) -> bool {
        match value {
            Some(percent) => {
                self.filter_percent = percent.min(100);
                true
            }
            None => false,
        }
    }

    pub fn in_range(&self, percentile: u8) -> bool {
        percentile >= self.filter_percent
    }
}

#[cfg(test)]
mod tests {
    use kanal::AsyncReceiver;
    use serde_json::json;

    use super::*;
    use crate::error::MessageError;
    use crate::storage::MemoryStorage;

    struct FixedSite(Option<SiteMode>);

    #[async_trait::async_trait]
    impl Messenger for FixedSite {
        async fn get_site_mode(&self, _host: &str) -> Result<SiteMode, MessageError> {
            self.0
                .ok_or_else(|| MessageError::Unreachable("background".to_string()))
        }

        async fn set_site_mode(&self, _host: &str, _mode: SiteMode) -> Result<(), MessageError> {
            Ok(())
        }

        async fn is_supported(&self, _host: &str) -> Result<bool, MessageError> {
            Ok(true)
        }

        fn subscribe_site_mode(&self, _host: &str) -> AsyncReceiver<SiteMode> {
            kanal::unbounded_async().1
        }

        async fn inject_css(&self, _css: &str) -> Result<(), MessageError> {
            Ok(())
        }

        async fn remove_css(&self, _css: &str) -> Result<(), MessageError> {
            Ok(())
        }

        async fn replace_css(&self, _old: &str, _css: &str) -> Result<(), MessageError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn load_applies_defaults() {
        let storage = MemoryStorage::new();
        let settings = Settings::load(&storage, &FixedSite(None), "example.com").await;

        assert_eq!(settings.global_mode, GlobalMode::Enable);
        assert_eq!(settings.site_mode, SiteMode::Follow);
        assert_eq!(settings.filter_percent, DEFAULT_FILTER_PERCENT);
        assert_eq!(settings.preference, Preference::default());
        assert!(settings.enabled());
    }

    #[tokio::test]
    async fn load_reads_stored_values() {
        let storage = MemoryStorage::new();
        storage.set(StorageKey::Mode, Some(json!("disable")));
        storage.set(StorageKey::Percent, Some(json!(55)));
        storage.set(StorageKey::Preference, Some(json!({ "highlight": "b {}" })));

        let site = FixedSite(Some(SiteMode::Include));
        let settings = Settings::load(&storage, &site, "example.com").await;

        assert_eq!(settings.global_mode, GlobalMode::Disable);
        assert_eq!(settings.filter_percent, 55);
        assert_eq!(settings.preference.highlight, "b {}");
        assert!(settings.enabled());
    }

    #[tokio::test]
    async fn corrupt_percent_keeps_default() {
        let storage = MemoryStorage::new();
        storage.set(StorageKey::Percent, Some(json!("thirty")));

        let settings = Settings::load(&storage, &FixedSite(None), "example.com").await;
        assert_eq!(settings.filter_percent, DEFAULT_FILTER_PERCENT);
    }

    #[test]
    fn filter_percent_rejects_missing_value() {
        let mut settings = Settings::default();
        assert!(!settings.try_set_filter_percent(None));
        assert_eq!(settings.filter_percent, DEFAULT_FILTER_PERCENT);

        assert!(settings.try_set_filter_percent(Some(0)));
        assert_eq!(settings.filter_percent, 0);

        assert!(settings.try_set_filter_percent(Some(250)));
        assert_eq!(settings.filter_percent, 100);
    }

    #[test]
    fn forbidden_overrides_site() {
        let mut settings = Settings::default();
        settings.set_site_mode(SiteMode::Include);
        assert!(!settings.set_global_mode(GlobalMode::Forbidden));
        assert!(settings.set_global_mode(GlobalMode::Disable));
        assert!(!settings.set_site_mode(SiteMode::Exclude));
    }

    #[test]
    fn range_is_inclusive() {
        let mut settings = Settings::default();
        settings.try_set_filter_percent(Some(50));
        assert!(settings.in_range(50));
        assert!(!settings.in_range(49));
    }
}
