use std::collections::HashMap;
use std::sync::Arc;

use insight_config::Config;
use insight_core::storage::{MemoryStorage, StorageKey};
use insight_dom::MemoryDocument;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::background::Background;
use crate::controller::ChannelSet;
use crate::runtime::Page;
use crate::state::PageState;

mod storage_tests;

pub(crate) const HOST: &str = "example.com";

/// Ten ranked words, so rank n sits at percentile 10 * n
pub(crate) fn seeded_storage() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::with_items(HashMap::from([
        (
            StorageKey::Rank,
            json!(["the", "be", "to", "of", "cat", "run", "ocean", "whale", "krill", "plankton"]),
        ),
        (
            StorageKey::Lemma,
            json!([
                ["cat", ["cats"]],
                ["whale", ["whales"]],
                ["run", ["running", "ran"]]
            ]),
        ),
    ])))
}

/// Timers long enough that only the test triggers scans
pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.scheduler.deferred_scan_ms = 60_000;
    config.translation.wait_ms = 10;
    config
}

pub(crate) struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub background: Arc<Background>,
    pub channels: ChannelSet,
    pub cancel_token: CancellationToken,
    pub page: Page<MemoryDocument>,
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

pub(crate) async fn try_start(
    storage: Arc<MemoryStorage>,
    config: Config,
    text: &str,
) -> (Arc<Background>, ChannelSet, CancellationToken, Option<Page<MemoryDocument>>) {
    let background = Arc::new(Background::new(storage.clone(), config.translation.clone()));
    background.load().await.expect("background loads");

    let channels = ChannelSet::new(config.scheduler.channel_capacity);
    let cancel_token = CancellationToken::new();
    let state = Arc::new(PageState::new(
        config,
        HOST,
        storage,
        background.clone(),
        background.clone(),
    ));
    let doc = MemoryDocument::from_plain_text(text).expect("page builds");

    let page = Page::start(state, doc, &channels, &cancel_token)
        .await
        .expect("page starts");
    (background, channels, cancel_token, page)
}

pub(crate) async fn start_page(storage: Arc<MemoryStorage>, config: Config, text: &str) -> Harness {
    let (background, channels, cancel_token, page) = try_start(storage.clone(), config, text).await;

    Harness {
        storage,
        background,
        channels,
        cancel_token,
        page: page.expect("host is supported"),
    }
}
