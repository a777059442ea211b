use insight_types::SiteMode;
use kanal::AsyncReceiver;

use crate::error::MessageError;

/// Requests a page sends to the background context
#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    async fn get_site_mode(&self, host: &str) -> Result<SiteMode, MessageError>;

    async fn set_site_mode(&self, host: &str, mode: SiteMode) -> Result<(), MessageError>;

    /// Global mode and site mode combined
    async fn is_supported(&self, host: &str) -> Result<bool, MessageError>;

    /// Site mode changes broadcast for `host`; dropping the receiver unsubscribes
    fn subscribe_site_mode(&self, host: &str) -> AsyncReceiver<SiteMode>;

    async fn inject_css(&self, css: &str) -> Result<(), MessageError>;

    async fn remove_css(&self, css: &str) -> Result<(), MessageError>;

    async fn replace_css(&self, old: &str, css: &str) -> Result<(), MessageError>;
}
