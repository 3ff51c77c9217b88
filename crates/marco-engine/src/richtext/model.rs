//! The intermediate rich-text document handed to game-side clients.
//!
//! Serialized as JSON, a document is a string, a tagged object, or an array
//! of those:
//!
//! ```json
//! ["Hello ", {"type": "style", "bold": true, "content": "world"}]
//! ```
//!
//! Every `content` field follows the same rule: adjacent strings are merged
//! and a list of one collapses to that one node. [`Content::from_nodes`]
//! enforces it on construction.

use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RichNode {
    Text(String),
    Element(RichElement),
}

impl From<&str> for RichNode {
    fn from(text: &str) -> Self {
        RichNode::Text(text.to_string())
    }
}

impl From<String> for RichNode {
    fn from(text: String) -> Self {
        RichNode::Text(text)
    }
}

impl From<RichElement> for RichNode {
    fn from(element: RichElement) -> Self {
        RichNode::Element(element)
    }
}

impl RichNode {
    /// Text a reader would see, without any styling or structure.
    pub fn plain_text(&self) -> String {
        match self {
            RichNode::Text(text) => text.clone(),
            RichNode::Element(element) => element.plain_text(),
        }
    }

    fn simplified(self) -> Self {
        match self {
            RichNode::Element(element) => RichNode::Element(element.simplified()),
            text => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RichElement {
    Style(Style),
    Link(Link),
    Mention(Mention),
    #[serde(rename = "img")]
    Image(Image),
    Block(Block),
    HorizontalRule,
}

impl RichElement {
    pub fn content(&self) -> Option<&Content> {
        match self {
            RichElement::Style(style) => Some(&style.content),
            RichElement::Link(link) => Some(&link.content),
            RichElement::Mention(mention) => Some(&mention.content),
            RichElement::Block(block) => Some(&block.content),
            RichElement::Image(_) | RichElement::HorizontalRule => None,
        }
    }

    fn content_mut(&mut self) -> Option<&mut Content> {
        match self {
            RichElement::Style(style) => Some(&mut style.content),
            RichElement::Link(link) => Some(&mut link.content),
            RichElement::Mention(mention) => Some(&mut mention.content),
            RichElement::Block(block) => Some(&mut block.content),
            RichElement::Image(_) | RichElement::HorizontalRule => None,
        }
    }

    fn plain_text(&self) -> String {
        match self {
            RichElement::Image(image) => image.alt.clone().unwrap_or_default(),
            other => other.content().map(Content::plain_text).unwrap_or_default(),
        }
    }

    fn simplified(mut self) -> Self {
        if let Some(content) = self.content_mut() {
            *content = std::mem::take(content).simplified();
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strike: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub spoiler: bool,
    /// 24-bit RGB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// 1 to 6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<u8>,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    #[serde(default, skip_serializing_if = "is_false")]
    pub room: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<MentionedUser>,
    #[serde(flatten)]
    pub player: Option<PlayerMention>,
    pub content: Content,
}

/// Text that mentions a whole room.
pub const ROOM_MENTION: &str = "@room";

impl Mention {
    pub fn room() -> Self {
        Self {
            room: true,
            user: None,
            player: None,
            content: Content::text(ROOM_MENTION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionedUser {
    pub mxid: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Marks a mention whose target is a bridged game player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMention {
    pub bridge: GameBridge,
    pub player: PlayerRef,
}

impl PlayerMention {
    pub fn minecraft(player_id: impl Into<String>) -> Self {
        Self {
            bridge: GameBridge::Minecraft,
            player: PlayerRef {
                uuid: player_id.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameBridge {
    Minecraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    /// The player's id as it appears in their puppet user id, usually 32
    /// hex digits without dashes.
    pub uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "block")]
    pub kind: BlockKind,
    /// Item number within an ordered list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<i64>,
    pub content: Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Quote,
    Bullet,
    Preformat,
}

/// The children of a rich-text element, or a whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Single(Box<RichNode>),
    Many(Vec<RichNode>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Many(Vec::new())
    }
}

impl From<RichNode> for Content {
    fn from(node: RichNode) -> Self {
        Content::Single(Box::new(node))
    }
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::from(RichNode::Text(text.into()))
    }

    /// Normalize a node list: empty strings are dropped, adjacent strings
    /// merged, and a single remaining node is unwrapped.
    pub fn from_nodes(nodes: Vec<RichNode>) -> Self {
        let mut merged: Vec<RichNode> = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                RichNode::Text(text) if text.is_empty() => {}
                RichNode::Text(text) => match merged.last_mut() {
                    Some(RichNode::Text(previous)) => previous.push_str(&text),
                    _ => merged.push(RichNode::Text(text)),
                },
                element => merged.push(element),
            }
        }

        if merged.len() == 1
            && let Some(only) = merged.pop()
        {
            return Content::from(only);
        }
        Content::Many(merged)
    }

    pub fn nodes(&self) -> &[RichNode] {
        match self {
            Content::Single(node) => std::slice::from_ref(node.as_ref()),
            Content::Many(nodes) => nodes,
        }
    }

    pub fn into_nodes(self) -> Vec<RichNode> {
        match self {
            Content::Single(node) => vec![*node],
            Content::Many(nodes) => nodes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }

    /// Re-apply normalization at every level.
    pub fn simplified(self) -> Self {
        Content::from_nodes(self.into_nodes().into_iter().map(RichNode::simplified).collect())
    }

    pub fn plain_text(&self) -> String {
        self.nodes().iter().map(RichNode::plain_text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bold(content: Content) -> RichNode {
        RichElement::Style(Style {
            bold: true,
            content,
            ..Style::default()
        })
        .into()
    }

    #[test]
    fn from_nodes_merges_and_unwraps() {
        let content = Content::from_nodes(vec!["a".into(), "".into(), "b".into()]);
        assert_eq!(content, Content::text("ab"));

        let content = Content::from_nodes(vec![]);
        assert_eq!(content, Content::Many(vec![]));
        assert!(content.is_empty());
    }

    #[test]
    fn from_nodes_keeps_elements_apart() {
        let content = Content::from_nodes(vec![
            "a".into(),
            bold(Content::text("b")),
            "c".into(),
            "d".into(),
        ]);
        assert_eq!(
            content,
            Content::Many(vec!["a".into(), bold(Content::text("b")), "cd".into()])
        );
    }

    #[test]
    fn simplified_normalizes_nested_content() {
        let raw = Content::Many(vec![bold(Content::Many(vec!["x".into(), "y".into()]))]);
        let once = raw.simplified();
        assert_eq!(once, Content::from(bold(Content::text("xy"))));
        assert_eq!(once.clone().simplified(), once);
    }

    #[test]
    fn serializes_style_with_only_set_fields() {
        let node = RichElement::Style(Style {
            color: Some(0xff0000),
            spoiler: true,
            content: Content::text("1"),
            ..Style::default()
        });
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"type": "style", "spoiler": true, "color": 0xff0000, "content": "1"})
        );
    }

    #[test]
    fn serializes_player_mention_flat() {
        let node = RichElement::Mention(Mention {
            room: false,
            user: Some(MentionedUser {
                mxid: "@_mc_0123456789abcdef0123456789abcdef:example.com".to_string(),
                display_name: "Steve".to_string(),
            }),
            player: Some(PlayerMention::minecraft("0123456789abcdef0123456789abcdef")),
            content: Content::text("Steve"),
        });
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "type": "mention",
                "user": {
                    "mxid": "@_mc_0123456789abcdef0123456789abcdef:example.com",
                    "displayName": "Steve"
                },
                "bridge": "minecraft",
                "player": {"uuid": "0123456789abcdef0123456789abcdef"},
                "content": "Steve"
            })
        );
    }

    #[test]
    fn serializes_unit_and_image_variants() {
        assert_eq!(
            serde_json::to_value(RichElement::HorizontalRule).unwrap(),
            json!({"type": "horizontalRule"})
        );
        assert_eq!(
            serde_json::to_value(RichElement::Image(Image::default())).unwrap(),
            json!({"type": "img"})
        );
    }

    #[test]
    fn deserializes_document() {
        let value = json!([
            "1 ",
            {"type": "mention", "room": true, "content": "@room"},
            {"type": "block", "block": "bullet", "n": 2, "content": ["a", {"type": "horizontalRule"}]}
        ]);
        let content: Content = serde_json::from_value(value).unwrap();

        assert_eq!(
            content,
            Content::Many(vec![
                "1 ".into(),
                RichElement::Mention(Mention::room()).into(),
                RichElement::Block(Block {
                    kind: BlockKind::Bullet,
                    n: Some(2),
                    content: Content::Many(vec!["a".into(), RichElement::HorizontalRule.into()]),
                })
                .into(),
            ])
        );
    }

    #[test]
    fn plain_text_flattens_structure() {
        let content = Content::Many(vec![
            "see ".into(),
            RichElement::Link(Link {
                href: "https://example.com".to_string(),
                content: Content::text("here"),
            })
            .into(),
            RichElement::Image(Image {
                alt: Some(" [img]".to_string()),
                ..Image::default()
            })
            .into(),
        ]);
        assert_eq!(content.plain_text(), "see here [img]");
    }
}
