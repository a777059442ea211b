use insight_config::highlight::HighlightConfig;
use insight_core::document::{ElementSpec, NewNode};
use insight_types::MatchSpan;

use crate::{DATA_LEMMA, DATA_PERCENT};

/// Highlight element for one span; in range by construction, so the base class is set
pub fn highlight_element(span: &MatchSpan, config: &HighlightConfig) -> ElementSpec {
    ElementSpec {
        tag: config.tag.clone(),
        classes: vec![config.class.clone()],
        data: vec![
            (DATA_PERCENT.to_string(), span.percentile.to_string()),
            (DATA_LEMMA.to_string(), span.lemma.clone()),
        ],
        text: span.text.clone(),
    }
}

/// Nodes that replace `text` so each span becomes a highlight element.
///
/// Gaps between spans stay plain text and empty gaps are dropped. An empty
/// `spans` yields an empty list: the caller leaves the node untouched.
pub fn build_replacement(text: &str, spans: &[MatchSpan], config: &HighlightConfig) -> Vec<NewNode> {
    if spans.is_empty() {
        return Vec::new();
    }

    let mut nodes = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            nodes.push(NewNode::Text(text[cursor..span.start].to_string()));
        }
        nodes.push(NewNode::Element(highlight_element(span, config)));
        cursor = span.end;
    }
    if cursor < text.len() {
        nodes.push(NewNode::Text(text[cursor..].to_string()));
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, start: usize, end: usize, percentile: u8, lemma: &str) -> MatchSpan {
        MatchSpan {
            start,
            end,
            text: text[start..end].to_string(),
            percentile,
            lemma: lemma.to_string(),
        }
    }

    fn shape(nodes: &[NewNode]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| match n {
                NewNode::Text(t) => format!("text:{t}"),
                NewNode::Element(e) => format!("{}:{}", e.tag, e.text),
            })
            .collect()
    }

    #[test]
    fn trailing_match() {
        let text = "I like cats";
        let nodes = build_replacement(text, &[span(text, 7, 11, 40, "cat")], &HighlightConfig::default());
        assert_eq!(shape(&nodes), vec!["text:I like ", "insight-word:cats"]);

        let NewNode::Element(element) = &nodes[1] else {
            panic!("expected element");
        };
        assert_eq!(element.classes, vec!["insight-word-highlight".to_string()]);
        assert_eq!(
            element.data,
            vec![
                ("percent".to_string(), "40".to_string()),
                ("lemma".to_string(), "cat".to_string()),
            ]
        );
    }

    #[test]
    fn adjacent_and_interior_matches() {
        let text = "whale krill, plankton!";
        let spans = [
            span(text, 0, 5, 80, "whale"),
            span(text, 6, 11, 90, "krill"),
            span(text, 13, 21, 100, "plankton"),
        ];
        let nodes = build_replacement(text, &spans, &HighlightConfig::default());
        assert_eq!(
            shape(&nodes),
            vec![
                "insight-word:whale",
                "text: ",
                "insight-word:krill",
                "text:, ",
                "insight-word:plankton",
                "text:!",
            ]
        );
    }

    #[test]
    fn no_spans_no_nodes() {
        assert!(build_replacement("nothing here", &[], &HighlightConfig::default()).is_empty());
    }
}
