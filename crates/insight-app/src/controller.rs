use std::sync::Arc;

use insight_core::storage::StorageKey;
use insight_highlight::ScanReport;
use insight_types::PopupEvent;
use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;

use crate::events::PageEvent;
use crate::state::PageState;

/// Centralized channel management
pub struct ChannelSet {
    pub page_events: (AsyncSender<PageEvent>, AsyncReceiver<PageEvent>),
    pub popup: (AsyncSender<PopupEvent>, AsyncReceiver<PopupEvent>),
    pub scans: (AsyncSender<ScanReport>, AsyncReceiver<ScanReport>),
}

impl ChannelSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            page_events: kanal::bounded_async(capacity),
            popup: kanal::bounded_async(16),
            scans: kanal::bounded_async(16),
        }
    }
}

/// Keys whose changes a page follows
const WATCHED_KEYS: [StorageKey; 4] = [
    StorageKey::Mode,
    StorageKey::Percent,
    StorageKey::IgnoreWord,
    StorageKey::Preference,
];

/// Forwarders from storage and the site-mode broadcast into the page's event channel.
///
/// Each attachment owns a child token of the page token; cancelling it ends
/// every forwarder and drops their receivers, which detaches them at the source.
pub struct WatchSet {
    state: Arc<PageState>,
    events_tx: AsyncSender<PageEvent>,
    parent: CancellationToken,
    current: Option<CancellationToken>,
}

impl WatchSet {
    pub fn new(
        state: Arc<PageState>,
        events_tx: AsyncSender<PageEvent>,
        parent: CancellationToken,
    ) -> Self {
        Self {
            state,
            events_tx,
            parent,
            current: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_watching(&self) -> bool {
        self.current.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Attach every watcher, replacing any previous set
    pub fn watch_all(&mut self) {
        self.unwatch_all();
        let token = self.parent.child_token();

        for key in WATCHED_KEYS {
            let rx = self.state.storage.watch(key);
            spawn_forwarder(rx, self.events_tx.clone(), token.clone(), PageEvent::from_storage_change);
        }

        let rx = self.state.messenger.subscribe_site_mode(&self.state.host);
        spawn_forwarder(rx, self.events_tx.clone(), token.clone(), |mode| {
            Some(PageEvent::SiteModeChanged(mode))
        });

        tracing::debug!("watchers attached for {}", self.state.host);
        self.current = Some(token);
    }

    pub fn unwatch_all(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
            tracing::debug!("watchers detached for {}", self.state.host);
        }
    }
}

fn spawn_forwarder<T, F>(
    rx: AsyncReceiver<T>,
    events_tx: AsyncSender<PageEvent>,
    cancel_token: CancellationToken,
    to_event: F,
) where
    T: Send + 'static,
    F: Fn(T) -> Option<PageEvent> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let item = tokio::select! {
                biased;
                _ = cancel_token.cancelled() => break,
                item = rx.recv() => match item {
                    Ok(item) => item,
                    Err(_) => break,
                },
            };

            let Some(event) = to_event(item) else {
                continue;
            };
            if events_tx.send(event).await.is_err() {
                break;
            }
        }
    });
}
