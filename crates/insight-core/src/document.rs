use insight_types::NodeId;

use crate::error::DomError;

/// Element created by a splice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    pub tag: String,
    pub classes: Vec<String>,
    /// `data-*` attributes, without the prefix
    pub data: Vec<(String, String)>,
    /// Single text child
    pub text: String,
}

/// Node inserted in place of a text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewNode {
    Text(String),
    Element(ElementSpec),
}

/// Nodes attached since the previous drain of the observer queue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationRecord {
    pub added_nodes: Vec<NodeId>,
}

/// Capabilities the highlighter needs from a live document.
///
/// Keeps scanning, splicing and mutation observation behind one seam so the
/// matching core never touches a concrete DOM.
pub trait Document {
    fn body(&self) -> NodeId;

    /// Descendant text nodes of `root` in document order, `root` excluded
    fn text_nodes_under(&self, root: NodeId) -> Vec<NodeId>;

    /// Attached elements with the given tag, in document order
    fn elements_by_tag(&self, tag: &str) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn is_element(&self, node: NodeId) -> bool;

    /// Uppercase tag name, `None` for text nodes
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Content of a text node
    fn text(&self, node: NodeId) -> Option<&str>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool);

    fn data(&self, node: NodeId, key: &str) -> Option<&str>;

    fn set_data(&mut self, node: NodeId, key: &str, value: String);

    /// Computed `display` value of an element
    fn computed_display(&self, node: NodeId) -> Option<&str>;

    /// False when the node or an ancestor is not rendered
    fn is_rendered(&self, node: NodeId) -> bool;

    /// Replace a text node with `replacement`, keeping sibling order.
    ///
    /// Returns the ids of the inserted nodes.
    fn splice(&mut self, node: NodeId, replacement: Vec<NewNode>) -> Result<Vec<NodeId>, DomError>;

    /// Drain pending mutation records
    fn take_mutations(&mut self) -> Vec<MutationRecord>;
}
