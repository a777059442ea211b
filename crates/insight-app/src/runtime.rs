use std::sync::Arc;

use insight_core::document::Document;
use insight_core::settings::Settings;
use insight_highlight::ScanReport;
use insight_types::{NodeId, PopupEvent};
use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;

use crate::controller::{ChannelSet, WatchSet};
use crate::events::hover::word_text;
use crate::scheduler::Scheduler;
use crate::state::PageState;

/// One highlighted page: its document plus everything that reacts to it
pub struct Page<D: Document> {
    pub(crate) doc: D,
    pub(crate) state: Arc<PageState>,
    pub(crate) scheduler: Scheduler,
    pub(crate) watches: WatchSet,
    pub(crate) popup_tx: AsyncSender<PopupEvent>,
    pub(crate) scans_tx: AsyncSender<ScanReport>,
}

impl<D: Document + Send> Page<D> {
    /// Startup sequence of a page.
    ///
    /// Returns `None` when highlighting is not supported on this host; the
    /// document is then left alone.
    pub async fn start(
        state: Arc<PageState>,
        doc: D,
        channels: &ChannelSet,
        cancel_token: &CancellationToken,
    ) -> anyhow::Result<Option<Self>> {
        tracing::info!("Starting page {}", state.host);
        if !state.messenger.is_supported(&state.host).await? {
            tracing::info!("Highlighting not supported on {}, staying idle", state.host);
            return Ok(None);
        }

        let settings = Settings::load(state.storage.as_ref(), state.messenger.as_ref(), &state.host).await;
        let css = settings.preference.highlight.clone();
        *state.settings.write().await = settings;

        state.frequency.write().await.load(state.storage.as_ref()).await;

        let mut page = Self {
            doc,
            scheduler: Scheduler::new(state.clone()),
            watches: WatchSet::new(
                state.clone(),
                channels.page_events.0.clone(),
                cancel_token.clone(),
            ),
            popup_tx: channels.popup.0.clone(),
            scans_tx: channels.scans.0.clone(),
            state,
        };

        page.scheduler.toggle_style(&mut page.doc).await;
        page.state.messenger.inject_css(&css).await?;
        page.watches.watch_all();
        page.scheduler
            .schedule_deferred_scan(channels.page_events.0.clone(), cancel_token.child_token());

        Ok(Some(page))
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn state(&self) -> &Arc<PageState> {
        &self.state
    }

    /// First live highlight whose text is `word`, ignoring case
    pub fn find_highlight(&self, word: &str) -> Option<NodeId> {
        let highlighter = self.scheduler.highlighter();
        highlighter
            .highlights(&self.doc)
            .into_iter()
            .filter(|node| highlighter.is_active_highlight(&self.doc, *node))
            .find(|node| word_text(&self.doc, *node).eq_ignore_ascii_case(word))
    }

    /// Publish a finished scan for whoever follows progress
    pub(crate) fn report_scan(&self, report: ScanReport) {
        match self.scans_tx.try_send(report) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("scan report dropped, channel full"),
            Err(e) => tracing::debug!("scan report dropped: {}", e),
        }
    }
}

#[cfg(test)]
impl<D: Document> Page<D> {
    pub(crate) fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub(crate) fn is_watching(&self) -> bool {
        self.watches.is_watching()
    }
}
