use html_escape::decode_html_entities;
use marco_syntax::markup::{Attribute, MarkupToken, lex_markup};

use super::tag::Tag;
use super::tree::{Element, MarkupTree, NodeId};

/// Deepest element nesting kept from the source. Start tags beyond it are
/// ignored and their content lands in the deepest open element.
pub const MAX_NESTING: usize = 256;

/// Parse chat markup into a tree rooted at a [`Tag::Fragment`].
///
/// Never fails: stray end tags are ignored, unclosed elements are closed at
/// end of input, and comments and declarations are dropped.
pub fn parse_markup(input: &str) -> MarkupTree {
    let mut builder = TreeBuilder::new();
    for token in lex_markup(input) {
        builder.push(token);
    }
    builder.tree
}

struct TreeBuilder {
    tree: MarkupTree,
    /// Open elements, root first.
    open: Vec<NodeId>,
    /// Start tags dropped for exceeding [`MAX_NESTING`], awaiting their end tag.
    ignored: Vec<Tag>,
    /// Set while inside a raw-text element whose content is discarded.
    raw_text: Option<Tag>,
}

impl TreeBuilder {
    fn new() -> Self {
        let tree = MarkupTree::new();
        let root = tree.root();
        Self {
            tree,
            open: vec![root],
            ignored: Vec::new(),
            raw_text: None,
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.tree.root())
    }

    fn push(&mut self, token: MarkupToken<'_>) {
        match token {
            MarkupToken::Text(raw) => {
                if self.raw_text.is_none() {
                    let text = decode_html_entities(raw);
                    let current = self.current();
                    self.tree.append_text(current, &text);
                }
            }
            MarkupToken::StartTag {
                name,
                attributes,
                self_closing,
            } => self.start_tag(Tag::from_name(name), &attributes, self_closing),
            MarkupToken::EndTag { name } => self.end_tag(Tag::from_name(name)),
            MarkupToken::Declaration(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag, attributes: &[Attribute<'_>], self_closing: bool) {
        if self.raw_text.is_some() {
            return;
        }
        if tag.is_raw_text() {
            if !self_closing {
                self.raw_text = Some(tag);
            }
            return;
        }

        let current = self.current();
        if self.open.len() > 1 && self.tree.tag(current).is_some_and(|open| open.closed_by(&tag)) {
            self.open.pop();
        }

        let leaf = tag.is_void() || self_closing;
        if !leaf && self.open.len() > MAX_NESTING {
            log::trace!("Ignoring <{tag}> nested deeper than {MAX_NESTING}");
            self.ignored.push(tag);
            return;
        }

        let mut element = Element::new(tag);
        for attribute in attributes {
            let name = attribute.name.to_ascii_lowercase();
            if element.has_attribute(&name) {
                continue;
            }
            let value = attribute
                .value
                .map(|value| decode_html_entities(value).into_owned())
                .unwrap_or_default();
            element.attributes.push((name, value));
        }

        let parent = self.current();
        let id = self.tree.create_element(element);
        self.tree.append_child(parent, id);
        if !leaf {
            self.open.push(id);
        }
    }

    fn end_tag(&mut self, tag: Tag) {
        if let Some(raw) = &self.raw_text {
            if *raw == tag {
                self.raw_text = None;
            }
            return;
        }
        if self.ignored.last() == Some(&tag) {
            self.ignored.pop();
            return;
        }
        // Index 0 is the root, which no end tag may close.
        if let Some(position) = self
            .open
            .iter()
            .rposition(|&id| self.tree.tag(id) == Some(&tag))
            && position > 0
        {
            self.open.truncate(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn parsed(input: &str) -> Value {
        snapshot(&parse_markup(input))
    }

    #[rstest]
    #[case("", json!([]))]
    #[case("1", json!("1"))]
    #[case("<b>1</b>", json!({"B": "1"}))]
    #[case("<B>1</b>", json!({"B": "1"}))]
    #[case("1<br>2", json!(["1", {"BR": []}, "2"]))]
    #[case("<br/>", json!({"BR": []}))]
    #[case("<img src=x>2", json!([{"IMG": []}, "2"]))]
    #[case("<b><i>1</b>2", json!([{"B": {"I": "1"}}, "2"]))]
    #[case("1</b>2", json!("12"))]
    #[case("<b>1", json!({"B": "1"}))]
    #[case("<ul><li>1<li>2</ul>", json!({"UL": [{"LI": "1"}, {"LI": "2"}]}))]
    #[case("<p>1<p>2", json!([{"P": "1"}, {"P": "2"}]))]
    #[case("<p>1<div>2</div>", json!([{"P": "1"}, {"DIV": "2"}]))]
    #[case("<mx-reply>1</mx-reply>2", json!([{"MX-REPLY": "1"}, "2"]))]
    #[case("1<!-- hidden -->2", json!("12"))]
    #[case("1<script>alert(1)</script>2", json!("12"))]
    #[case("<style>b { }</style>", json!([]))]
    #[case("1 < 2", json!("1 < 2"))]
    fn builds_tree(#[case] input: &str, #[case] expected: Value) {
        assert_eq!(parsed(input), expected);
    }

    #[test]
    fn decodes_entities_in_text() {
        let tree = parse_markup("&lt;b&gt; &amp; &quot;x&quot; &#39;y&#39; &nbsp;");
        assert_eq!(tree.text_content(), "<b> & \"x\" 'y' \u{a0}");
    }

    #[test]
    fn decodes_attribute_values_and_keeps_first_duplicate() {
        let tree = parse_markup(r#"<a HREF="https://x.com/?a=1&amp;b=2" href="ignored" data-flag>1</a>"#);
        let link = tree.children(tree.root())[0];
        let element = tree.element(link).unwrap();

        assert_eq!(element.tag, Tag::A);
        assert_eq!(
            element.attributes,
            vec![
                ("href".to_string(), "https://x.com/?a=1&b=2".to_string()),
                ("data-flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let depth = MAX_NESTING + 50;
        let input = format!("{}x{}", "<b>".repeat(depth), "</b>".repeat(depth));
        let tree = parse_markup(&input);

        let mut levels = 0;
        let mut id = tree.root();
        while let Some(&child) = tree.children(id).first() {
            if tree.element(child).is_none() {
                break;
            }
            levels += 1;
            id = child;
        }
        assert_eq!(levels, MAX_NESTING);
        assert_eq!(tree.text_content(), "x");
    }
}
