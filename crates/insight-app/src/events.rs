use insight_core::document::Document;
use insight_core::storage::{StorageChange, StorageKey};
use insight_types::{GlobalMode, HoverEvent, Preference, SiteMode, Visibility};
use kanal::AsyncReceiver;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::runtime::Page;

pub mod hover;
pub mod settings;
pub mod visibility;

use hover::handle_hover;
use settings::{
    handle_ignore_change, handle_ignore_word, handle_mode_change, handle_percent_change,
    handle_preference_change, handle_site_mode_change,
};
use visibility::handle_visibility;

/// Everything the page event loop reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    ModeChanged(Option<GlobalMode>),
    SiteModeChanged(SiteMode),
    PercentChanged(Option<u8>),
    IgnoreListChanged(Option<Vec<String>>),
    PreferenceChanged(Option<Preference>),
    VisibilityChanged(Visibility),
    Hover(HoverEvent),
    /// The user asked never to highlight this lemma again
    IgnoreWord(String),
    DeferredScan,
    DomMutated,
}

fn decode<T: DeserializeOwned>(key: StorageKey, value: Option<Value>) -> Option<T> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => serde_json::from_value(value)
            .inspect_err(|e| tracing::warn!("Ignoring malformed {}: {}", key.as_str(), e))
            .ok(),
    }
}

impl PageEvent {
    /// Event for a change of one of the watched keys
    pub fn from_storage_change(change: StorageChange) -> Option<Self> {
        let StorageChange { key, new_value, .. } = change;
        match key {
            StorageKey::Mode => Some(Self::ModeChanged(decode(key, new_value))),
            StorageKey::Percent => Some(Self::PercentChanged(decode(key, new_value))),
            StorageKey::IgnoreWord => Some(Self::IgnoreListChanged(decode(key, new_value))),
            StorageKey::Preference => Some(Self::PreferenceChanged(decode(key, new_value))),
            StorageKey::SiteMode | StorageKey::Rank | StorageKey::Lemma => None,
        }
    }
}

/// Page main loop; runs until cancelled or every sender is gone
pub async fn event_loop<D: Document + Send>(
    page: &mut Page<D>,
    events_rx: AsyncReceiver<PageEvent>,
    cancel_token: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Page {} waiting for events", page.state.host);
    loop {
        let event = tokio::select! {
            _ = cancel_token.cancelled() => break,
            event = events_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        tracing::debug!("[EVENT_LOOP] {:?}", event);
        if let Err(e) = handle_event(page, event).await {
            tracing::error!("Page event failed: {e:#}");
        }
    }

    tracing::info!("[EVENT_LOOP] Page {} stopped", page.state.host);
    page.watches.unwatch_all();
    Ok(())
}

pub async fn handle_event<D: Document + Send>(page: &mut Page<D>, event: PageEvent) -> anyhow::Result<()> {
    match event {
        PageEvent::ModeChanged(mode) => handle_mode_change(page, mode).await?,
        PageEvent::SiteModeChanged(mode) => handle_site_mode_change(page, mode).await?,
        PageEvent::PercentChanged(percent) => handle_percent_change(page, percent).await?,
        PageEvent::IgnoreListChanged(words) => handle_ignore_change(page, words).await?,
        PageEvent::PreferenceChanged(preference) => {
            handle_preference_change(page, preference).await?
        }
        PageEvent::VisibilityChanged(visibility) => handle_visibility(page, visibility).await?,
        PageEvent::Hover(event) => handle_hover(page, event).await?,
        PageEvent::IgnoreWord(lemma) => handle_ignore_word(page, &lemma).await?,
        PageEvent::DeferredScan => {
            let report = page.scheduler.scan_all(&mut page.doc).await;
            page.report_scan(report);
        }
        PageEvent::DomMutated => {
            let report = page.scheduler.observe(&mut page.doc).await;
            if report.matches > 0 {
                tracing::debug!("mutations added {} matches", report.matches);
            }
        }
    }

    Ok(())
}
