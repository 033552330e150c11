//! In-memory document implementing [`DomNode`].
//!
//! Nodes live in an arena shared through `Rc`, so handles are cheap to clone
//! and compare. Used for headless resolution and by the test suites.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::DomNode;

#[derive(Debug, Clone, Default)]
struct NodeData {
    parent: Option<usize>,
    tag: Option<String>,
    attributes: Vec<(String, String)>,
    disabled: bool,
}

/// Arena-backed document.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Rc<RefCell<Vec<NodeData>>>,
}

/// Handle to one node of a [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct MemoryNode {
    doc: MemoryDocument,
    index: usize,
}

impl PartialEq for MemoryNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.doc.nodes, &other.doc.nodes) && self.index == other.index
    }
}

impl Eq for MemoryNode {}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, data: NodeData) -> MemoryNode {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(data);
        MemoryNode {
            doc: self.clone(),
            index: nodes.len() - 1,
        }
    }

    /// Create a parentless element.
    pub fn element(&self, tag: &str) -> MemoryNode {
        self.push(NodeData {
            tag: Some(tag.to_ascii_lowercase()),
            ..NodeData::default()
        })
    }

    /// Create an element under `parent`.
    pub fn child(&self, parent: &MemoryNode, tag: &str) -> MemoryNode {
        let node = self.element(tag);
        self.nodes.borrow_mut()[node.index].parent = Some(parent.index);
        node
    }

    /// Create a text node under `parent`; it has no tag and no class list.
    pub fn text(&self, parent: &MemoryNode) -> MemoryNode {
        self.push(NodeData {
            parent: Some(parent.index),
            ..NodeData::default()
        })
    }
}

impl MemoryNode {
    /// Set (or replace) an attribute, keeping first-insertion order.
    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        let mut nodes = self.doc.nodes.borrow_mut();
        let attrs = &mut nodes[self.index].attributes;
        match attrs.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value.to_owned(),
            None => attrs.push((name.to_ascii_lowercase(), value.to_owned())),
        }
        self
    }

    /// Set the `class` attribute from a list.
    pub fn with_classes(&self, classes: &[&str]) -> &Self {
        self.set_attr("class", &classes.join(" "))
    }

    pub fn set_disabled_property(&self, disabled: bool) -> &Self {
        self.doc.nodes.borrow_mut()[self.index].disabled = disabled;
        self
    }
}

impl DomNode for MemoryNode {
    fn parent(&self) -> Option<Self> {
        let parent = self.doc.nodes.borrow()[self.index].parent?;
        Some(Self {
            doc: self.doc.clone(),
            index: parent,
        })
    }

    fn class_names(&self) -> Vec<String> {
        let nodes = self.doc.nodes.borrow();
        let data = &nodes[self.index];
        if data.tag.is_none() {
            return Vec::new();
        }
        data.attributes
            .iter()
            .find(|(name, _)| name == "class")
            .map(|(_, value)| value.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn tag_name(&self) -> Option<String> {
        self.doc.nodes.borrow()[self.index].tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.doc.nodes.borrow()[self.index]
            .attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.doc.nodes.borrow()[self.index].attributes.clone()
    }

    fn disabled_property(&self) -> bool {
        self.doc.nodes.borrow()[self.index].disabled
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryDocument;
    use crate::dom::{DomNode, ancestors_inclusive};

    #[test]
    fn ancestors_walk_to_root() {
        let doc = MemoryDocument::new();
        let html = doc.element("HTML");
        let body = doc.child(&html, "body");
        let leaf = doc.child(&body, "span");
        let tags: Vec<_> = ancestors_inclusive(&leaf)
            .filter_map(|n| n.tag_name())
            .collect();
        assert_eq!(tags, ["span", "body", "html"]);
    }

    #[test]
    fn text_nodes_have_no_class_list() {
        let doc = MemoryDocument::new();
        let div = doc.element("div");
        div.with_classes(&["a", "b"]);
        let text = doc.text(&div);
        assert!(text.class_names().is_empty());
        assert_eq!(text.tag_name(), None);
        assert_eq!(text.parent(), Some(div));
    }
}
