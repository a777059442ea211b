use std::sync::Arc;
use std::time::Duration;

use insight_core::document::Document;
use insight_highlight::{Highlighter, ScanReport};
use insight_types::NodeId;
use kanal::AsyncSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::PageEvent;
use crate::state::PageState;

/// Decides when the highlighter runs and with which settings
pub struct Scheduler {
    highlighter: Highlighter,
    state: Arc<PageState>,
}

impl Scheduler {
    pub fn new(state: Arc<PageState>) -> Self {
        Self {
            highlighter: Highlighter::new(state.config.highlight.clone()),
            state,
        }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Highlight the subtree under `root` when the page is enabled.
    ///
    /// The records of our own splices are dropped; mutations that were
    /// already pending are handled after the walk.
    pub async fn scan<D: Document + Send>(&self, doc: &mut D, root: NodeId) -> ScanReport {
        let settings = self.state.settings.read().await.clone();
        if !settings.enabled() {
            tracing::debug!("scan skipped, highlighting disabled");
            return ScanReport::default();
        }

        let mut frequency = self.state.frequency.write().await;
        frequency.load(self.state.storage.as_ref()).await;

        let pending = doc.take_mutations();
        let mut report = self
            .highlighter
            .highlight_subtree(doc, root, &*frequency, settings.filter_percent);
        doc.take_mutations();

        if !pending.is_empty() {
            report.absorb(
                self.highlighter
                    .handle_mutations(doc, &pending, &*frequency, &settings),
            );
            doc.take_mutations();
        }
        tracing::info!(
            "Scan done: {} matches in {} text nodes",
            report.matches,
            report.spliced
        );
        report
    }

    pub async fn scan_all<D: Document + Send>(&self, doc: &mut D) -> ScanReport {
        let body = doc.body();
        self.scan(doc, body).await
    }

    /// Drain pending mutation records and highlight the added subtrees
    pub async fn observe<D: Document + Send>(&self, doc: &mut D) -> ScanReport {
        let records = doc.take_mutations();
        if records.is_empty() {
            return ScanReport::default();
        }

        let settings = self.state.settings.read().await;
        let frequency = self.state.frequency.read().await;
        let report = self
            .highlighter
            .handle_mutations(doc, &records, &*frequency, &settings);
        // records of the splices above describe our own markup
        doc.take_mutations();
        report
    }

    pub async fn restyle_by_threshold<D: Document + Send>(&self, doc: &mut D) -> usize {
        let settings = self.state.settings.read().await;
        self.highlighter.restyle_by_threshold(doc, &settings)
    }

    pub async fn restyle_by_ignore<D: Document + Send>(&self, doc: &mut D) -> usize {
        let settings = self.state.settings.read().await;
        let frequency = self.state.frequency.read().await;
        self.highlighter.restyle_by_ignore(doc, &*frequency, &settings)
    }

    pub async fn toggle_style<D: Document + Send>(&self, doc: &mut D) {
        let enabled = self.state.settings.read().await.enabled();
        self.highlighter.toggle_global_style(doc, enabled);
    }

    /// Queue one full scan after the configured delay
    pub fn schedule_deferred_scan(
        &self,
        tx: AsyncSender<PageEvent>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        let delay = Duration::from_millis(self.state.config.scheduler.deferred_scan_ms);

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    tracing::debug!("deferred scan cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    tracing::debug!("deferred scan after {}ms", delay.as_millis());
                    if let Err(e) = tx.send(PageEvent::DeferredScan).await {
                        tracing::warn!("Failed to queue deferred scan: {}", e);
                    }
                }
            }
        })
    }
}
