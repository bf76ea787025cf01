//! Arena DOM consumed by the serializer
//!
//! The serializer walks an owned tree of element/text/comment nodes with
//! provenance attached. Nodes live in one flat arena and refer to each other
//! by [`NodeId`], which keeps traversal free of reference counting and lets
//! the walker hold plain copies of ids across mutable borrows of the output
//! state. The tree is read-only during serialization.

pub mod ingest;
pub mod provenance;

use provenance::{DataMw, DataParsoid, DiffMarks};

/// Index of a node in its [`Dom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// An element node: tag, ordered attributes, provenance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub dp: DataParsoid,
    pub mw: Option<DataMw>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
    pub diff: DiffMarks,
}

/// The document tree. Construction goes through the `append_*` builders;
/// [`crate::dom::ingest`] uses them to inflate annotated HTML and tests use
/// them directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Dom {
    nodes: Vec<Node>,
    body: NodeId,
}

impl Dom {
    /// A document holding just an empty `<body>`.
    pub fn new() -> Self {
        let body = Node {
            parent: None,
            prev: None,
            next: None,
            children: Vec::new(),
            kind: NodeKind::Element(Element {
                name: "body".to_string(),
                ..Element::default()
            }),
            diff: DiffMarks::default(),
        };
        Dom {
            nodes: vec![body],
            body: NodeId(0),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let prev = self.nodes[parent.0].children.last().copied();
        self.nodes.push(Node {
            parent: Some(parent),
            prev,
            next: None,
            children: Vec::new(),
            kind,
            diff: DiffMarks::default(),
        });
        if let Some(prev) = prev {
            self.nodes[prev.0].next = Some(id);
        }
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.push_node(
            parent,
            NodeKind::Element(Element {
                name: name.to_string(),
                ..Element::default()
            }),
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::Text(text.to_string()))
    }

    pub fn append_comment(&mut self, parent: NodeId, data: &str) -> NodeId {
        self.push_node(parent, NodeKind::Comment(data.to_string()))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn set_diff(&mut self, id: NodeId, diff: DiffMarks) {
        self.nodes[id.0].diff = diff;
    }

    pub fn diff(&self, id: NodeId) -> &DiffMarks {
        &self.nodes[id.0].diff
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element(_))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Text(_))
    }

    pub fn is_comment(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Comment(_))
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn comment(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Comment(c) => Some(c.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev
    }

    /// Provenance of an element; text and comment nodes read as defaults.
    pub fn dp(&self, id: NodeId) -> DataParsoid {
        self.element(id).map(|el| el.dp.clone()).unwrap_or_default()
    }

    /// The element's `typeof` attribute contains the given token prefix.
    pub fn has_typeof(&self, id: NodeId, prefix: &str) -> bool {
        self.attr(id, "typeof")
            .is_some_and(|t| t.split_whitespace().any(|tok| tok.starts_with(prefix)))
    }

    /// Find an element by its `id` attribute, in document order.
    pub fn element_by_html_id(&self, html_id: &str) -> Option<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .find(|&id| self.attr(id, "id") == Some(html_id))
    }

    /// All-text check used by the text emitter's html-pre exception.
    pub fn all_children_are_text(&self, id: NodeId) -> bool {
        self.nodes[id.0]
            .children
            .iter()
            .all(|&c| self.is_text(c))
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_links() {
        let mut dom = Dom::new();
        let a = dom.append_element(dom.body(), "p");
        let b = dom.append_element(dom.body(), "p");
        let t = dom.append_text(a, "hi");

        assert_eq!(dom.next_sibling(a), Some(b));
        assert_eq!(dom.prev_sibling(b), Some(a));
        assert_eq!(dom.parent(t), Some(a));
        assert_eq!(dom.first_child(a), Some(t));
        assert_eq!(dom.children(dom.body()), &[a, b]);
        assert_eq!(dom.text(t), Some("hi"));
    }

    #[test]
    fn test_typeof_lookup() {
        let mut dom = Dom::new();
        let span = dom.append_element(dom.body(), "span");
        dom.element_mut(span)
            .unwrap()
            .attrs
            .push(("typeof".into(), "mw:Transclusion mw:Foo".into()));
        assert!(dom.has_typeof(span, "mw:Transclusion"));
        assert!(!dom.has_typeof(span, "mw:Extension"));
    }
}
