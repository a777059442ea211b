use insight_core::document::Document;
use insight_highlight::DATA_LEMMA;
use insight_translator::fallback_url;
use insight_types::{HoverEvent, NodeId, PopupEvent};

use crate::runtime::Page;

/// Visible text of a highlight element
pub(crate) fn word_text<D: Document>(doc: &D, node: NodeId) -> String {
    doc.text_nodes_under(node)
        .into_iter()
        .filter_map(|text| doc.text(text))
        .collect()
}

pub async fn handle_hover<D: Document + Send>(page: &mut Page<D>, event: HoverEvent) -> anyhow::Result<()> {
    match event {
        HoverEvent::Enter(node) => {
            if !page.scheduler.highlighter().is_active_highlight(&page.doc, node) {
                return Ok(());
            }

            let word = word_text(&page.doc, node);
            let lemma = page.doc.data(node, DATA_LEMMA).unwrap_or_default().to_string();
            let variant_of = page
                .state
                .frequency
                .read()
                .await
                .variant_lemma(&word.to_lowercase())
                .map(str::to_string);

            let text = match page.state.translations.get(&word, variant_of.as_deref()).await {
                Some(text) => text,
                None => page.state.config.translation.fallback_text.clone(),
            };
            tracing::debug!("showTranslation {} [{}]", word, text);

            page.popup_tx
                .send(PopupEvent::Show { node, text, lemma })
                .await?;
        }
        HoverEvent::Leave(node) => {
            if page.scheduler.highlighter().is_active_highlight(&page.doc, node) {
                page.popup_tx.send(PopupEvent::Hide).await?;
            }
        }
        HoverEvent::Click(node) => {
            if !page.scheduler.highlighter().is_active_highlight(&page.doc, node) {
                return Ok(());
            }

            let word = word_text(&page.doc, node);
            if page.state.translations.cached(&word).is_none() {
                let translation = &page.state.config.translation;
                let url = fallback_url(&word, &translation.source_lang, &translation.target_lang);
                page.popup_tx.send(PopupEvent::OpenUrl(url.to_string())).await?;
            }
        }
    }

    Ok(())
}
