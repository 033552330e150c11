//! Minimal read-only view of a DOM node.
//!
//! The resolver only ever walks upward and reads classes, attributes and the
//! tag name, so that is all a backend has to provide.

/// Read-only access to an element-like node.
///
/// Implementations must tolerate nodes that are not elements (text nodes,
/// foreign objects): such nodes report no classes, no attributes and no tag.
pub trait DomNode: Clone {
    /// The parent element, or `None` at the document root.
    fn parent(&self) -> Option<Self>;

    /// Class names in list order; empty when the node has no class list.
    fn class_names(&self) -> Vec<String>;

    /// Tag name, lowercased. `None` for non-element nodes.
    fn tag_name(&self) -> Option<String>;

    fn attribute(&self, name: &str) -> Option<String>;

    /// All attributes as `(name, value)` pairs in document order.
    fn attributes(&self) -> Vec<(String, String)>;

    /// The reflected `disabled` property (form controls only).
    fn disabled_property(&self) -> bool {
        false
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_names().iter().any(|c| c == class)
    }
}

/// Iterator over `start` and its ancestors, nearest first.
pub struct Ancestors<N: DomNode> {
    next: Option<N>,
}

impl<N: DomNode> Iterator for Ancestors<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

/// Walk `start` and its ancestors, nearest first.
pub fn ancestors_inclusive<N: DomNode>(start: &N) -> Ancestors<N> {
    Ancestors {
        next: Some(start.clone()),
    }
}

/// Return the first value produced by `extract` walking ancestor-or-self,
/// nearest first.
///
/// This is the one traversal primitive every resolver is built on; the walk
/// is bounded by document depth.
pub fn nearest_ancestor<N, T, F>(start: &N, mut extract: F) -> Option<T>
where
    N: DomNode,
    F: FnMut(&N) -> Option<T>,
{
    ancestors_inclusive(start).find_map(|node| extract(&node))
}
