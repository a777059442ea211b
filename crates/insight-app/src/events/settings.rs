use insight_core::document::Document;
use insight_types::{GlobalMode, Preference, SiteMode};

use crate::runtime::Page;

/// Re-apply the body class, and scan once when highlighting was just switched on
async fn apply_enable<D: Document + Send>(page: &mut Page<D>, was_enabled: bool, enabled: bool) {
    page.scheduler.toggle_style(&mut page.doc).await;

    if enabled && !was_enabled {
        tracing::info!("Highlighting enabled on {}", page.state.host);
        page.scheduler.scan_all(&mut page.doc).await;
    }
}

pub async fn handle_mode_change<D: Document + Send>(
    page: &mut Page<D>,
    mode: Option<GlobalMode>,
) -> anyhow::Result<()> {
    tracing::info!("watch local:mode {:?}", mode);
    let Some(mode) = mode else {
        return Ok(());
    };

    let (was_enabled, enabled) = {
        let mut settings = page.state.settings.write().await;
        let was_enabled = settings.enabled();
        (was_enabled, settings.set_global_mode(mode))
    };
    apply_enable(page, was_enabled, enabled).await;
    Ok(())
}

pub async fn handle_site_mode_change<D: Document + Send>(
    page: &mut Page<D>,
    mode: SiteMode,
) -> anyhow::Result<()> {
    tracing::info!("watch site-mode {}", mode);

    let (was_enabled, enabled) = {
        let mut settings = page.state.settings.write().await;
        if settings.site_mode == mode {
            return Ok(());
        }
        let was_enabled = settings.enabled();
        (was_enabled, settings.set_site_mode(mode))
    };
    apply_enable(page, was_enabled, enabled).await;
    Ok(())
}

/// A lower threshold can qualify words never wrapped, so it rescans before restyling
pub async fn handle_percent_change<D: Document + Send>(
    page: &mut Page<D>,
    percent: Option<u8>,
) -> anyhow::Result<()> {
    tracing::info!("watch local:percent {:?}", percent);

    let lowered = {
        let mut settings = page.state.settings.write().await;
        let previous = settings.filter_percent;
        if !settings.try_set_filter_percent(percent) {
            return Ok(());
        }
        settings.filter_percent < previous
    };

    if lowered {
        page.scheduler.scan_all(&mut page.doc).await;
    }
    page.scheduler.restyle_by_threshold(&mut page.doc).await;
    Ok(())
}

pub async fn handle_ignore_change<D: Document + Send>(
    page: &mut Page<D>,
    words: Option<Vec<String>>,
) -> anyhow::Result<()> {
    tracing::info!(
        "watch local:ignore-word ({} words)",
        words.as_ref().map_or(0, Vec::len)
    );

    if let Some(words) = words {
        page.state.frequency.write().await.replace_ignored(words);
    }
    page.scheduler.restyle_by_ignore(&mut page.doc).await;
    Ok(())
}

pub async fn handle_preference_change<D: Document + Send>(
    page: &mut Page<D>,
    preference: Option<Preference>,
) -> anyhow::Result<()> {
    tracing::info!("watch local:preference");
    let Some(preference) = preference else {
        return Ok(());
    };

    let old = {
        let mut settings = page.state.settings.write().await;
        std::mem::replace(&mut settings.preference, preference.clone())
    };
    page.state
        .messenger
        .replace_css(&old.highlight, &preference.highlight)
        .await?;
    Ok(())
}

/// Popup "ignore" action; the storage watch later confirms the new list
pub async fn handle_ignore_word<D: Document + Send>(page: &mut Page<D>, lemma: &str) -> anyhow::Result<()> {
    if lemma.is_empty() {
        return Ok(());
    }

    let storage = page.state.storage.clone();
    if !page.state.frequency.write().await.ignore(lemma, storage) {
        tracing::debug!("{} already ignored", lemma);
        return Ok(());
    }
    page.scheduler.restyle_by_ignore(&mut page.doc).await;
    Ok(())
}
