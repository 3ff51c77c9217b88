//! Arena-backed markup tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. The
//! layout pass rewrites the tree in place (inserting separators, replacing
//! line breaks, dropping empty nodes), and indices keep that free of
//! borrow juggling. Detached nodes are allowed: a node that is no longer
//! any element's child simply stops being reachable from the root.

use super::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    /// Lowercased names with decoded values, in source order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone)]
pub struct MarkupTree {
    nodes: Vec<Node>,
}

impl Default for MarkupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupTree {
    /// An empty document: a lone [`Tag::Fragment`] root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Element(Element::new(Tag::Fragment))],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.nodes[id.0] {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.node(id) {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&Tag> {
        self.element(id).map(|element| &element.tag)
    }

    /// Children of an element; empty for text nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Node::Element(element) => &element.children,
            Node::Text(_) => &[],
        }
    }

    fn children_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match &mut self.nodes[id.0] {
            Node::Element(element) => Some(&mut element.children),
            Node::Text(_) => None,
        }
    }

    /// Create a text node that is not yet attached anywhere.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(Node::Text(text.into()))
    }

    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.push(Node::Element(element))
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Append text to `parent`, extending its last child when that is text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.children(parent).last()
            && let Some(existing) = self.text_mut(last)
        {
            existing.push_str(text);
            return;
        }
        let id = self.create_text(text);
        self.append_child(parent, id);
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.children_mut(parent) {
            children.push(child);
        }
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if let Some(children) = self.children_mut(parent) {
            children.insert(index, child);
        }
    }

    pub fn remove_child(&mut self, parent: NodeId, index: usize) {
        if let Some(children) = self.children_mut(parent) {
            children.remove(index);
        }
    }

    /// Replace `old` with `new` among `parent`'s children.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if let Some(children) = self.children_mut(parent)
            && let Some(slot) = children.iter_mut().find(|child| **child == old)
        {
            *slot = new;
        }
    }

    /// Concatenated text of every reachable text node, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            match self.node(id) {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => stack.extend(element.children.iter().rev()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_tree_has_fragment_root() {
        let tree = MarkupTree::new();
        assert_eq!(tree.tag(tree.root()), Some(&Tag::Fragment));
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn append_text_merges_with_previous_text() {
        let mut tree = MarkupTree::new();
        let root = tree.root();
        tree.append_text(root, "1 ");
        tree.append_text(root, "<");
        tree.append_text(root, " 2");

        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.text_content(), "1 < 2");
    }

    #[test]
    fn replace_and_remove_children() {
        let mut tree = MarkupTree::new();
        let root = tree.root();
        let br = tree.create_element(Element::new(Tag::Br));
        tree.append_child(root, br);
        let first = tree.create_text("a");
        tree.insert_child(root, 0, first);

        let newline = tree.create_text("\n");
        tree.replace_child(root, br, newline);
        assert_eq!(tree.text_content(), "a\n");

        tree.remove_child(root, 0);
        assert_eq!(tree.children(root), &[newline]);
    }

    #[test]
    fn attribute_lookup() {
        let mut element = Element::new(Tag::Span);
        element
            .attributes
            .push(("data-mx-spoiler".to_string(), String::new()));
        assert!(element.has_attribute("data-mx-spoiler"));
        assert_eq!(element.attribute("data-mx-color"), None);
    }
}
