use serde_json::{Map, Value};

use super::tree::{MarkupTree, Node, NodeId};

/// Compact JSON view of a tree.
///
/// Text becomes a string and an element becomes `{"TAG": content}`, where
/// content is the lone child when there is exactly one and an array
/// otherwise. The root fragment is rendered as its content alone. Attributes
/// are not shown.
pub fn snapshot(tree: &MarkupTree) -> Value {
    content(tree, tree.children(tree.root()))
}

fn content(tree: &MarkupTree, children: &[NodeId]) -> Value {
    match children {
        [only] => node(tree, *only),
        _ => Value::Array(children.iter().map(|&id| node(tree, id)).collect()),
    }
}

fn node(tree: &MarkupTree, id: NodeId) -> Value {
    match tree.node(id) {
        Node::Text(text) => Value::String(text.clone()),
        Node::Element(element) => {
            let mut map = Map::new();
            map.insert(element.tag.name(), content(tree, &element.children));
            Value::Object(map)
        }
    }
}
