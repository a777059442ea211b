use insight_types::NodeId;

use crate::document::{MemoryDocument, NodeKind};

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

impl MemoryDocument {
    /// Markup of a node and its subtree, lowercase tags, classes before data attributes
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Markup of the children of a node
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(*child, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        match self.kind(node) {
            Some(NodeKind::Text(text)) => out.push_str(&escape(text, false)),
            Some(NodeKind::Element(element)) => {
                let tag = element.tag.to_ascii_lowercase();
                out.push('<');
                out.push_str(&tag);
                if !element.classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", escape(&element.classes.join(" "), true)));
                }
                for (key, value) in &element.data {
                    out.push_str(&format!(" data-{}=\"{}\"", key, escape(value, true)));
                }
                out.push('>');
                for child in self.children(node) {
                    self.write_node(*child, out);
                }
                out.push_str(&format!("</{tag}>"));
            }
            None => {}
        }
    }
}
