use insight_core::document::Document;
use insight_core::error::DomError;

use crate::document::MemoryDocument;

impl MemoryDocument {
    /// Build a page from plain text.
    ///
    /// Blank lines separate blocks, with `\n` or `\r\n` line endings; `# `
    /// and `## ` prefixes make headings, anything else a paragraph. The
    /// result has no pending mutations, as if the page finished loading
    /// before anyone observed it.
    pub fn from_plain_text(page: &str) -> Result<Self, DomError> {
        let mut doc = MemoryDocument::new();
        let body = doc.body();

        let page = page.replace("\r\n", "\n");
        for block in page.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
            let (tag, text) = if let Some(rest) = block.strip_prefix("## ") {
                ("h2", rest)
            } else if let Some(rest) = block.strip_prefix("# ") {
                ("h1", rest)
            } else {
                ("p", block)
            };
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            doc.append_element(body, tag, &text)?;
        }

        doc.take_mutations();
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_become_elements() {
        let doc = MemoryDocument::from_plain_text(
            "# Title\n\nFirst   paragraph\nwraps here.\n\n\n## Sub\n\nLast.",
        )
        .unwrap();

        assert_eq!(
            doc.inner_html(doc.body()),
            "<h1>Title</h1><p>First paragraph wraps here.</p><h2>Sub</h2><p>Last.</p>"
        );
    }

    #[test]
    fn crlf_blank_lines_split_blocks() {
        let doc = MemoryDocument::from_plain_text("# Title\r\n\r\nOne\r\nline.\r\n\r\nTwo.\r\n").unwrap();

        assert_eq!(
            doc.inner_html(doc.body()),
            "<h1>Title</h1><p>One line.</p><p>Two.</p>"
        );
    }

    #[test]
    fn loaded_page_has_no_mutations() {
        let mut doc = MemoryDocument::from_plain_text("one\n\ntwo").unwrap();
        assert!(doc.take_mutations().is_empty());
    }
}
