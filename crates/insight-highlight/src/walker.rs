use insight_config::highlight::HighlightConfig;
use insight_core::document::{Document, MutationRecord};
use insight_core::language::WordClassifier;
use insight_core::settings::Settings;
use insight_types::NodeId;

use crate::matcher::{find_matches, should_scan};
use crate::splicer::build_replacement;
use crate::{DATA_LEMMA, DATA_PERCENT};

/// Outcome of one scan over a subtree
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Text nodes that passed the parent and text filters
    pub scanned: usize,
    /// Text nodes replaced by highlight markup
    pub spliced: usize,
    pub matches: usize,
    /// Nodes whose splice failed and were left as they were
    pub failed: usize,
    /// Stopped early after exceeding the match cap
    pub capped: bool,
}

impl ScanReport {
    pub fn absorb(&mut self, other: ScanReport) {
        self.scanned += other.scanned;
        self.spliced += other.spliced;
        self.matches += other.matches;
        self.failed += other.failed;
        self.capped |= other.capped;
    }
}

/// Walks documents, wraps qualifying words and keeps highlight styling in sync
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    config: HighlightConfig,
}

impl Highlighter {
    pub fn new(config: HighlightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Parent-level filter: allowed tag, no ignore class, not a flex container
    fn accepts_parent<D: Document + ?Sized>(&self, doc: &D, parent: NodeId) -> bool {
        let allowed = doc
            .tag_name(parent)
            .is_some_and(|tag| self.config.allows_tag(tag));
        if !allowed || doc.has_class(parent, &self.config.ignore_class) {
            return false;
        }

        !doc.computed_display(parent)
            .is_some_and(|display| display.contains("flex"))
    }

    /// Text nodes under `root` worth matching, in document order
    pub fn candidates<D: Document + ?Sized>(&self, doc: &D, root: NodeId) -> Vec<NodeId> {
        doc.text_nodes_under(root)
            .into_iter()
            .filter(|node| {
                doc.parent(*node)
                    .is_some_and(|parent| self.accepts_parent(doc, parent))
            })
            .filter(|node| doc.is_rendered(*node))
            .filter(|node| {
                doc.text(*node)
                    .is_some_and(|text| should_scan(text, self.config.min_text_len))
            })
            .collect()
    }

    /// Wrap every qualifying word under `root`.
    ///
    /// A failed splice leaves that node unchanged and the walk continues.
    pub fn highlight_subtree<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        root: NodeId,
        classifier: &dyn WordClassifier,
        filter_percent: u8,
    ) -> ScanReport {
        let mut report = ScanReport::default();

        for node in self.candidates(doc, root) {
            report.scanned += 1;

            let Some(text) = doc.text(node).map(str::to_string) else {
                continue;
            };
            let spans = find_matches(&text, classifier, filter_percent);
            if spans.is_empty() {
                continue;
            }

            let found = spans.len();
            let replacement = build_replacement(&text, &spans, &self.config);
            match doc.splice(node, replacement) {
                Ok(_) => {
                    report.spliced += 1;
                    report.matches += found;
                }
                Err(e) => {
                    tracing::warn!("Failed to highlight text node {:?}: {}", node, e);
                    report.failed += 1;
                }
            }

            if report.matches > self.config.max_matches {
                tracing::warn!(
                    "Match cap of {} exceeded, stopping scan",
                    self.config.max_matches
                );
                report.capped = true;
                break;
            }
        }

        tracing::debug!(
            "scanned {} text nodes, spliced {}, {} matches",
            report.scanned,
            report.spliced,
            report.matches
        );
        report
    }

    /// Highlight elements currently in the document
    pub fn highlights<D: Document + ?Sized>(&self, doc: &D) -> Vec<NodeId> {
        doc.elements_by_tag(&self.config.tag)
    }

    fn stored_percent<D: Document + ?Sized>(doc: &D, node: NodeId) -> Option<u8> {
        doc.data(node, DATA_PERCENT)?.parse().ok()
    }

    /// Re-evaluate the base class of every highlight against the threshold.
    ///
    /// Returns the number of highlights left in range.
    pub fn restyle_by_threshold<D: Document + ?Sized>(&self, doc: &mut D, settings: &Settings) -> usize {
        let mut in_range = 0;
        for node in self.highlights(doc) {
            let Some(percent) = Self::stored_percent(doc, node) else {
                tracing::debug!("highlight {:?} has no usable percent", node);
                continue;
            };
            let on = settings.in_range(percent);
            doc.toggle_class(node, &self.config.class, on);
            in_range += usize::from(on);
        }
        in_range
    }

    /// Refresh every highlight's percentile from the classifier, e.g. after
    /// the ignore set changed, then re-apply the threshold.
    pub fn restyle_by_ignore<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        classifier: &dyn WordClassifier,
        settings: &Settings,
    ) -> usize {
        let mut in_range = 0;
        for node in self.highlights(doc) {
            let Some(lemma) = doc.data(node, DATA_LEMMA).map(str::to_string) else {
                continue;
            };
            let percent = classifier.percentile(&lemma);
            doc.set_data(node, DATA_PERCENT, percent.to_string());

            let on = settings.in_range(percent);
            doc.toggle_class(node, &self.config.class, on);
            in_range += usize::from(on);
        }
        in_range
    }

    /// Show or hide all highlight styling at once through the body class
    pub fn toggle_global_style<D: Document + ?Sized>(&self, doc: &mut D, enabled: bool) {
        let body = doc.body();
        doc.toggle_class(body, &self.config.enable_class, enabled);
    }

    /// Scan the element subtrees added by DOM mutations.
    ///
    /// Our own highlights, engine UI and text nodes are skipped. Each root is
    /// scanned on its own so one failure cannot abort the batch.
    pub fn handle_mutations<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        records: &[MutationRecord],
        classifier: &dyn WordClassifier,
        settings: &Settings,
    ) -> ScanReport {
        let mut report = ScanReport::default();
        if !settings.enabled() {
            return report;
        }

        for node in records.iter().flat_map(|r| r.added_nodes.iter().copied()) {
            if !doc.is_element(node) {
                continue;
            }
            if doc.has_class(node, &self.config.class)
                || doc.has_class(node, &self.config.ignore_class)
                || doc
                    .tag_name(node)
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(&self.config.tag))
            {
                continue;
            }
            if !doc.is_rendered(node) {
                tracing::trace!("skip unrendered mutation root {:?}", node);
                continue;
            }

            report.absorb(self.highlight_subtree(doc, node, classifier, settings.filter_percent));
        }

        report
    }

    /// Whether a hovered node is a live highlight a popup may be shown for
    pub fn is_active_highlight<D: Document + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        doc.has_class(node, &self.config.class) && !doc.has_class(node, &self.config.ignore_class)
    }
}
