use insight_core::document::Document;
use insight_core::storage::{Storage, StorageExt, StorageKey};
use insight_types::{GlobalMode, Preference, Visibility};
use serde::de::DeserializeOwned;

use super::settings::{
    handle_ignore_change, handle_mode_change, handle_percent_change, handle_preference_change,
    handle_site_mode_change,
};
use crate::runtime::Page;

/// Hidden pages stop listening; on return they reattach, then catch up on
/// changes missed while hidden
pub async fn handle_visibility<D: Document + Send>(
    page: &mut Page<D>,
    visibility: Visibility,
) -> anyhow::Result<()> {
    tracing::info!("visibilitychange {:?}", visibility);
    match visibility {
        Visibility::Hidden => page.watches.unwatch_all(),
        Visibility::Visible => {
            page.watches.watch_all();
            sync_settings(page).await;
        }
    }
    Ok(())
}

async fn read_setting<T: DeserializeOwned + Send>(storage: &dyn Storage, key: StorageKey) -> Option<T> {
    storage
        .get_typed::<T>(key)
        .await
        .inspect_err(|e| tracing::warn!("Failed to read {}: {}", key.as_str(), e))
        .ok()
        .flatten()
}

fn log_failure(what: &str, result: anyhow::Result<()>) {
    if let Err(e) = result {
        tracing::warn!("Failed to sync {}: {}", what, e);
    }
}

/// Re-read every setting and run the handler of each one that drifted.
///
/// Each key is handled on its own; a value that cannot be read or applied
/// is logged and the rest still sync.
pub async fn sync_settings<D: Document + Send>(page: &mut Page<D>) {
    let state = page.state.clone();
    let storage = state.storage.as_ref();
    let current = state.settings.read().await.clone();

    match state.messenger.get_site_mode(&state.host).await {
        Ok(site_mode) if site_mode != current.site_mode => {
            log_failure("site mode", handle_site_mode_change(page, site_mode).await);
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to read site mode for {}: {}", state.host, e),
    }

    let mode = read_setting::<GlobalMode>(storage, StorageKey::Mode).await;
    if mode.is_some_and(|mode| mode != current.global_mode) {
        log_failure("mode", handle_mode_change(page, mode).await);
    }

    let percent = read_setting::<u8>(storage, StorageKey::Percent).await;
    if percent.is_some_and(|percent| percent.min(100) != current.filter_percent) {
        log_failure("percent", handle_percent_change(page, percent).await);
    }

    if let Some(mut words) = read_setting::<Vec<String>>(storage, StorageKey::IgnoreWord).await {
        words.sort();
        words.dedup();
        let known = state.frequency.read().await.ignored_words();
        if words != known {
            log_failure("ignore list", handle_ignore_change(page, Some(words)).await);
        }
    }

    let preference = read_setting::<Preference>(storage, StorageKey::Preference).await;
    if preference.as_ref().is_some_and(|p| *p != current.preference) {
        log_failure("preference", handle_preference_change(page, preference).await);
    }
}
