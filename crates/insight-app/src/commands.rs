use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use insight_config::Config;
use insight_core::document::Document;
use insight_core::messaging::Messenger;
use insight_core::storage::{Storage, StorageExt, StorageKey};
use insight_dictionary::{load_lemma_file, load_rank_file, load_translation_file};
use insight_dom::MemoryDocument;
use insight_types::{GlobalMode, HoverEvent, PopupEvent, SiteMode};
use tokio_util::sync::CancellationToken;

use crate::background::Background;
use crate::controller::ChannelSet;
use crate::events::{PageEvent, event_loop, handle_event};
use crate::runtime::Page;
use crate::state::PageState;
use crate::storage::JsonFileStorage;

async fn open_background(config: &Config) -> anyhow::Result<(Arc<JsonFileStorage>, Arc<Background>)> {
    let storage = Arc::new(JsonFileStorage::open(&config.storage.store_path())?);
    let background = Arc::new(Background::new(storage.clone(), config.translation.clone()));
    background.load().await?;
    Ok((storage, background))
}

pub async fn install(config: &Config, rank: &Path, lemma: &Path) -> anyhow::Result<()> {
    let (storage, background) = open_background(config).await?;
    let rank = load_rank_file(rank)?;
    let lemma = load_lemma_file(lemma)?;
    background.install(&rank, &lemma).await?;
    tracing::info!("Word lists written to {}", storage.path().display());
    Ok(())
}

pub async fn highlight(
    config: Config,
    page_path: &Path,
    host: &str,
    translations: Option<&Path>,
    hover: Option<&str>,
) -> anyhow::Result<()> {
    let (storage, background) = open_background(&config).await?;
    if let Some(path) = translations {
        background.load_translations(load_translation_file(path)?);
    }

    let text = tokio::fs::read_to_string(page_path).await?;
    let doc = MemoryDocument::from_plain_text(&text)?;

    let channels = ChannelSet::new(config.scheduler.channel_capacity);
    let cancel_token = CancellationToken::new();
    let state = Arc::new(PageState::new(
        config,
        host,
        storage,
        background.clone(),
        background.clone(),
    ));

    let Some(mut page) = Page::start(state, doc.clone(), &channels, &cancel_token).await? else {
        println!("{}", doc.inner_html(doc.body()));
        return Ok(());
    };

    let events_rx = channels.page_events.1.clone();
    let loop_token = cancel_token.clone();
    let task = tokio::spawn(async move {
        let result = event_loop(&mut page, events_rx, loop_token).await;
        (page, result)
    });

    let report = channels.scans.1.recv().await?;
    tracing::info!(
        "Highlighted {} words in {} text nodes{}",
        report.matches,
        report.spliced,
        if report.capped { " (capped)" } else { "" }
    );

    cancel_token.cancel();
    let (mut page, result) = task.await?;
    result?;
    tracing::debug!("{} style sheets applied", background.styles().len());

    let doc = page.document();
    println!("{}", doc.inner_html(doc.body()));

    if let Some(word) = hover {
        let Some(node) = page.find_highlight(word) else {
            tracing::warn!("No highlight for {}", word);
            return Ok(());
        };

        handle_event(&mut page, PageEvent::Hover(HoverEvent::Enter(node))).await?;
        if let PopupEvent::Show { text, lemma, .. } = channels.popup.1.recv().await? {
            println!("{word} ({lemma}): {text}");
        }
    }

    Ok(())
}

async fn update_ignore_list(config: &Config, lemma: &str, ignore: bool) -> anyhow::Result<()> {
    let storage = JsonFileStorage::open(&config.storage.store_path())?;
    let mut words: BTreeSet<String> = storage
        .get_typed::<Vec<String>>(StorageKey::IgnoreWord)
        .await?
        .unwrap_or_default()
        .into_iter()
        .collect();

    let lemma = lemma.to_lowercase();
    let changed = if ignore {
        words.insert(lemma.clone())
    } else {
        words.remove(&lemma)
    };
    if !changed {
        tracing::info!("Ignore list already up to date for {}", lemma);
        return Ok(());
    }

    let words: Vec<String> = words.into_iter().collect();
    storage.set_typed(StorageKey::IgnoreWord, &words).await?;
    tracing::info!("{} ignored words", words.len());
    Ok(())
}

pub async fn ignore(config: &Config, lemma: &str) -> anyhow::Result<()> {
    update_ignore_list(config, lemma, true).await
}

pub async fn unignore(config: &Config, lemma: &str) -> anyhow::Result<()> {
    update_ignore_list(config, lemma, false).await
}

pub async fn set_percent(config: &Config, value: u8) -> anyhow::Result<()> {
    let storage = JsonFileStorage::open(&config.storage.store_path())?;
    storage.set_typed(StorageKey::Percent, &value).await?;
    tracing::info!("Threshold set to {}", value);
    Ok(())
}

pub async fn set_mode(config: &Config, mode: &str) -> anyhow::Result<()> {
    let mode: GlobalMode = mode.parse().map_err(anyhow::Error::msg)?;
    let (storage, _) = open_background(config).await?;
    storage.set_typed(StorageKey::Mode, &mode).await?;
    tracing::info!("Global mode set to {}", mode);
    Ok(())
}

pub async fn set_site_mode(config: &Config, host: &str, mode: &str) -> anyhow::Result<()> {
    let mode: SiteMode = mode.parse().map_err(anyhow::Error::msg)?;
    let (_, background) = open_background(config).await?;
    background.set_site_mode(host, mode).await?;
    tracing::info!("Site mode for {} set to {}", host, mode);
    Ok(())
}

/// Stored settings as pretty JSON; word lists are summarised
pub async fn show(config: &Config) -> anyhow::Result<()> {
    let storage = JsonFileStorage::open(&config.storage.store_path())?;
    println!("{}", settings_json(&storage).await?);
    Ok(())
}

async fn settings_json(storage: &dyn Storage) -> anyhow::Result<String> {
    let mut out = serde_json::Map::new();
    for key in StorageKey::ALL {
        let Some(value) = storage.get_item(key).await? else {
            continue;
        };
        let value = match (key, value) {
            (StorageKey::Rank | StorageKey::Lemma, serde_json::Value::Array(items)) => {
                serde_json::Value::from(format!("{} entries", items.len()))
            }
            (_, value) => value,
        };
        out.insert(key.as_str().to_string(), value);
    }
    Ok(serde_json::to_string_pretty(&out)?)
}
