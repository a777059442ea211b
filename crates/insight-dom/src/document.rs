use std::collections::BTreeMap;

use insight_core::document::{Document, ElementSpec, MutationRecord, NewNode};
use insight_core::error::DomError;
use insight_types::NodeId;

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub data: BTreeMap<String, String>,
    pub display: Option<String>,
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena-backed document tree.
///
/// Removed nodes stay in the arena detached, so stale ids keep resolving and
/// report [`DomError::Detached`] instead of aliasing new nodes.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    mutations: Vec<MutationRecord>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn default_display(tag: &str) -> &'static str {
    match tag {
        "P" | "DIV" | "H1" | "H2" | "H3" | "H4" | "H5" | "H6" | "BODY" | "HTML" | "SUMMARY" => {
            "block"
        }
        _ => "inline",
    }
}

impl MemoryDocument {
    /// `<html><body></body></html>`
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            mutations: Vec::new(),
        };
        doc.root = doc.create_element("html");
        doc.body = doc.create_element("body");
        doc.link(doc.root, doc.body, None);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// New detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element {
            tag: tag.to_ascii_uppercase(),
            classes: Vec::new(),
            data: BTreeMap::new(),
            display: None,
            hidden: false,
        }))
    }

    /// New detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Attach `child` as the last child of `parent`, recording a mutation when
    /// `parent` is in the document
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.node(child)?;
        match &self.node(parent)?.kind {
            NodeKind::Element(_) => {}
            NodeKind::Text(_) => return Err(DomError::NotElement(parent)),
        }

        let siblings = &self.node(parent)?.children;
        if let Some(r) = reference {
            if r == child || !siblings.contains(&r) {
                return Err(DomError::Detached(r));
            }
        }

        self.unlink(child);
        let index = reference.and_then(|r| self.nodes[parent.0].children.iter().position(|c| *c == r));
        self.link(parent, child, index);

        if self.is_attached(parent) {
            self.mutations.push(MutationRecord {
                added_nodes: vec![child],
            });
        }
        Ok(())
    }

    /// Create an element holding `text` and append it to `parent`
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        text: &str,
    ) -> Result<NodeId, DomError> {
        let element = self.create_element(tag);
        if !text.is_empty() {
            let text = self.create_text(text);
            self.link(element, text, None);
        }
        self.append_child(parent, element)?;
        Ok(element)
    }

    /// Detach a node and its subtree
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        if self.node(node)?.parent.is_none() {
            return Err(DomError::Detached(node));
        }
        self.unlink(node);
        Ok(())
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.toggle_class(node, class, true);
    }

    pub fn set_display(&mut self, node: NodeId, display: &str) {
        if let Some(element) = self.element_mut(node) {
            element.display = Some(display.to_string());
        }
    }

    /// Hidden elements and their descendants are not rendered
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(element) = self.element_mut(node) {
            element.hidden = hidden;
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map_or(&[][..], |n| n.children.as_slice())
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    /// Concatenated text of a subtree
    pub fn text_content(&self, node: NodeId) -> String {
        match self.nodes.get(node.0).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(NodeKind::Element(_)) => self
                .children(node)
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
            None => String::new(),
        }
    }

    pub(crate) fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node.0).map(|n| &n.kind)
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id)? {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        let children = &mut self.nodes[parent.0].children;
        match index {
            Some(i) => children.insert(i, child),
            None => children.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    fn unlink(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != child);
        }
    }

    fn build(&mut self, node: NewNode) -> NodeId {
        match node {
            NewNode::Text(text) => self.create_text(&text),
            NewNode::Element(ElementSpec {
                tag,
                classes,
                data,
                text,
            }) => {
                let element = self.create_element(&tag);
                if let Some(e) = self.element_mut(element) {
                    e.classes = classes;
                    e.data = data.into_iter().collect();
                }
                let text = self.create_text(&text);
                self.link(element, text, None);
                element
            }
        }
    }

    fn collect(&self, node: NodeId, out: &mut Vec<NodeId>, keep: &dyn Fn(&NodeKind) -> bool) {
        for child in self.children(node) {
            if keep(&self.nodes[child.0].kind) {
                out.push(*child);
            }
            self.collect(*child, out, keep);
        }
    }
}

impl Document for MemoryDocument {
    fn body(&self) -> NodeId {
        self.body
    }

    fn text_nodes_under(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect(root, &mut out, &|kind| matches!(kind, NodeKind::Text(_)));
        out
    }

    fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect(self.root, &mut out, &|kind| {
            matches!(kind, NodeKind::Element(e) if e.tag.eq_ignore_ascii_case(tag))
        });
        out
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        let present = element.classes.iter().any(|c| c == class);
        if on && !present {
            element.classes.push(class.to_string());
        } else if !on && present {
            element.classes.retain(|c| c != class);
        }
    }

    fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.element(node)?.data.get(key).map(String::as_str)
    }

    fn set_data(&mut self, node: NodeId, key: &str, value: String) {
        if let Some(element) = self.element_mut(node) {
            element.data.insert(key.to_string(), value);
        }
    }

    fn computed_display(&self, node: NodeId) -> Option<&str> {
        let element = self.element(node)?;
        Some(element.display.as_deref().unwrap_or(default_display(&element.tag)))
    }

    fn is_rendered(&self, node: NodeId) -> bool {
        if !self.is_attached(node) {
            return false;
        }

        let mut current = Some(node);
        while let Some(id) = current {
            if self.element(id).is_some_and(|e| e.hidden) {
                return false;
            }
            current = self.parent(id);
        }
        true
    }

    fn splice(&mut self, node: NodeId, replacement: Vec<NewNode>) -> Result<Vec<NodeId>, DomError> {
        let target = self.node(node)?;
        if !matches!(target.kind, NodeKind::Text(_)) {
            return Err(DomError::NotText(node));
        }
        let parent = match target.parent {
            Some(parent) if self.is_attached(parent) => parent,
            _ => return Err(DomError::Detached(node)),
        };

        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == node)
            .ok_or(DomError::Detached(node))?;

        let added: Vec<NodeId> = replacement.into_iter().map(|node| self.build(node)).collect();

        self.unlink(node);
        for (offset, child) in added.iter().enumerate() {
            self.link(parent, *child, Some(index + offset));
        }

        self.mutations.push(MutationRecord {
            added_nodes: added.clone(),
        });
        Ok(added)
    }

    fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(doc: &mut MemoryDocument, text: &str) -> (NodeId, NodeId) {
        let body = doc.body();
        let p = doc.append_element(body, "p", text).unwrap();
        let text = doc.children(p)[0];
        (p, text)
    }

    #[test]
    fn text_nodes_follow_document_order() {
        let mut doc = MemoryDocument::new();
        let (p1, t1) = paragraph(&mut doc, "first");
        let span = doc.append_element(p1, "span", "inner").unwrap();
        let inner = doc.children(span)[0];
        let (_, t2) = paragraph(&mut doc, "second");

        assert_eq!(doc.text_nodes_under(doc.body()), vec![t1, inner, t2]);
        assert_eq!(doc.text_nodes_under(t1), Vec::<NodeId>::new());
    }

    #[test]
    fn splice_preserves_siblings() {
        let mut doc = MemoryDocument::new();
        let (p, text) = paragraph(&mut doc, "I like cats");
        let before = doc.create_text("<");
        doc.insert_before(p, before, Some(text)).unwrap();
        let after = doc.create_text(">");
        doc.append_child(p, after).unwrap();

        let added = doc
            .splice(
                text,
                vec![
                    NewNode::Text("I like ".into()),
                    NewNode::Element(ElementSpec {
                        tag: "insight-word".into(),
                        classes: vec!["hl".into()],
                        data: vec![("lemma".into(), "cat".into())],
                        text: "cats".into(),
                    }),
                ],
            )
            .unwrap();

        assert_eq!(doc.children(p), &[before, added[0], added[1], after]);
        assert_eq!(doc.text_content(p), "<I like cats>");
        assert_eq!(doc.tag_name(added[1]), Some("INSIGHT-WORD"));
        assert!(doc.has_class(added[1], "hl"));
        assert_eq!(doc.data(added[1], "lemma"), Some("cat"));
        assert_eq!(doc.parent(text), None);
    }

    #[test]
    fn splice_rejects_detached_and_non_text() {
        let mut doc = MemoryDocument::new();
        let (p, text) = paragraph(&mut doc, "gone soon");
        assert_eq!(doc.splice(p, vec![]), Err(DomError::NotText(p)));

        doc.remove(p).unwrap();
        assert_eq!(doc.splice(text, vec![]), Err(DomError::Detached(text)));
        assert_eq!(
            doc.splice(NodeId(999), vec![]),
            Err(DomError::UnknownNode(NodeId(999)))
        );
    }

    #[test]
    fn mutations_record_attached_insertions_only() {
        let mut doc = MemoryDocument::new();
        let div = doc.create_element("div");
        let text = doc.create_text("detached build");
        doc.append_child(div, text).unwrap();
        assert!(doc.take_mutations().is_empty());

        let body = doc.body();
        doc.append_child(body, div).unwrap();
        let records = doc.take_mutations();
        assert_eq!(records, vec![MutationRecord { added_nodes: vec![div] }]);
        assert!(doc.take_mutations().is_empty());
    }

    #[test]
    fn hidden_ancestor_hides_text() {
        let mut doc = MemoryDocument::new();
        let (p, text) = paragraph(&mut doc, "hidden words");
        assert!(doc.is_rendered(text));
        doc.set_hidden(p, true);
        assert!(!doc.is_rendered(text));
    }

    #[test]
    fn display_defaults_by_tag() {
        let mut doc = MemoryDocument::new();
        let (p, text) = paragraph(&mut doc, "x");
        let body = doc.body();
        let span = doc.append_element(body, "span", "").unwrap();
        assert_eq!(doc.computed_display(p), Some("block"));
        assert_eq!(doc.computed_display(span), Some("inline"));
        assert_eq!(doc.computed_display(text), None);

        doc.set_display(p, "inline-flex");
        assert_eq!(doc.computed_display(p), Some("inline-flex"));
    }

    #[test]
    fn class_toggle_is_idempotent() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        doc.toggle_class(body, "on", true);
        doc.toggle_class(body, "on", true);
        assert!(doc.has_class(body, "on"));
        doc.toggle_class(body, "on", false);
        assert!(!doc.has_class(body, "on"));
    }
}
