//! Conversion of a laid-out markup tree into rich text.
//!
//! Each element maps to at most one rich-text node; elements with no rich
//! counterpart (paragraphs, tables, unknown tags) are transparent and their
//! children are spliced into the parent. The walk is bounded by
//! [`WalkOptions::max_depth`]: anything nested deeper is dropped.

use std::sync::OnceLock;

use regex::Regex;

use super::color::parse_html_color;
use super::links::{is_linkable, parse_content_uri, user_link_target};
use super::model::{
    Block, BlockKind, Content, Image, Link, Mention, MentionedUser, PlayerMention, RichElement,
    RichNode, Style,
};
use super::refs::ResolvedRefs;
use crate::markup::{Element, MarkupTree, Node, NodeId, Tag};

/// Default bound on element nesting during a walk.
pub const DEFAULT_MAX_DEPTH: usize = 100;

static ROOM_MENTION_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Turn `@room` in text into room mentions.
    pub allow_room_mention: bool,
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            allow_room_mention: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Item numbering for the list currently being walked. `None` is unordered.
type ListCounter = Option<i64>;

/// Walk a laid-out tree. Returns `None` when nothing survives.
pub fn walk(tree: &MarkupTree, refs: &ResolvedRefs, options: &WalkOptions) -> Option<Content> {
    let walker = Walker {
        tree,
        refs,
        options,
    };
    let mut counter = None;
    let content = Content::from_nodes(walker.children(tree.root(), 0, &mut counter));
    (!content.is_empty()).then_some(content)
}

/// Split text around `@room` mentions. Only whole words match, so `@rooms`
/// stays text.
pub fn split_room_mentions(text: &str) -> Vec<RichNode> {
    let regex = ROOM_MENTION_REGEX
        .get_or_init(|| Regex::new(r"@room(?-u:\b)").expect("Invalid room mention regex"));

    let mut nodes = Vec::new();
    let mut last = 0;
    for found in regex.find_iter(text) {
        if found.start() > last {
            nodes.push(RichNode::from(&text[last..found.start()]));
        }
        nodes.push(RichElement::Mention(Mention::room()).into());
        last = found.end();
    }
    if last < text.len() {
        nodes.push(RichNode::from(&text[last..]));
    }
    nodes
}

struct Walker<'a> {
    tree: &'a MarkupTree,
    refs: &'a ResolvedRefs,
    options: &'a WalkOptions,
}

impl Walker<'_> {
    fn children(&self, id: NodeId, depth: usize, counter: &mut ListCounter) -> Vec<RichNode> {
        self.tree
            .children(id)
            .iter()
            .flat_map(|&child| self.node(child, depth + 1, counter))
            .collect()
    }

    fn node(&self, id: NodeId, depth: usize, counter: &mut ListCounter) -> Vec<RichNode> {
        match self.tree.node(id) {
            Node::Text(text) => self.text(text),
            Node::Element(element) => {
                if depth > self.options.max_depth {
                    log::debug!(
                        "Dropping <{}> nested deeper than {}",
                        element.tag,
                        self.options.max_depth
                    );
                    return Vec::new();
                }
                self.element(id, element, depth, counter)
            }
        }
    }

    fn text(&self, text: &str) -> Vec<RichNode> {
        if text.is_empty() {
            Vec::new()
        } else if self.options.allow_room_mention {
            split_room_mentions(text)
        } else {
            vec![RichNode::from(text)]
        }
    }

    fn element(
        &self,
        id: NodeId,
        element: &Element,
        depth: usize,
        counter: &mut ListCounter,
    ) -> Vec<RichNode> {
        match &element.tag {
            Tag::B | Tag::Strong => self.style(id, depth, counter, Style {
                bold: true,
                ..Style::default()
            }),
            Tag::I | Tag::Em => self.style(id, depth, counter, Style {
                italic: true,
                ..Style::default()
            }),
            Tag::U => self.style(id, depth, counter, Style {
                underline: true,
                ..Style::default()
            }),
            Tag::Del | Tag::Strike => self.style(id, depth, counter, Style {
                strike: true,
                ..Style::default()
            }),
            Tag::Code => self.style(id, depth, counter, Style {
                code: true,
                ..Style::default()
            }),
            Tag::Heading(level) => self.style(id, depth, counter, Style {
                heading: Some(*level),
                ..Style::default()
            }),
            Tag::Font | Tag::Span => {
                let color = ["data-mx-color", "color"]
                    .iter()
                    .find_map(|name| element.attribute(name).and_then(parse_html_color));
                let spoiler = element.has_attribute("data-mx-spoiler");
                if color.is_none() && !spoiler {
                    return self.children(id, depth, counter);
                }
                self.style(id, depth, counter, Style {
                    color,
                    spoiler,
                    ..Style::default()
                })
            }
            Tag::Ul => self.children(id, depth, &mut None),
            Tag::Ol => {
                let start = element.attribute("start").and_then(parse_int_prefix);
                self.children(id, depth, &mut Some(start.unwrap_or(1)))
            }
            Tag::Li => {
                let n = *counter;
                if let Some(next) = counter.as_mut() {
                    *next = next.saturating_add(1);
                }
                self.block(id, depth, counter, BlockKind::Bullet, n)
            }
            Tag::Blockquote => self.block(id, depth, counter, BlockKind::Quote, None),
            Tag::Pre => self.block(id, depth, counter, BlockKind::Preformat, None),
            Tag::Hr => vec![RichElement::HorizontalRule.into()],
            Tag::A => {
                let content = self.children(id, depth, counter);
                self.anchor(element, content)
            }
            Tag::Img => vec![self.image(element).into()],
            Tag::Fragment
            | Tag::Br
            | Tag::Div
            | Tag::P
            | Tag::Caption
            | Tag::Table
            | Tag::Tbody
            | Tag::Td
            | Tag::Th
            | Tag::Thead
            | Tag::Tr
            | Tag::Sub
            | Tag::Sup
            | Tag::Other(_) => self.children(id, depth, counter),
        }
    }

    fn style(
        &self,
        id: NodeId,
        depth: usize,
        counter: &mut ListCounter,
        style: Style,
    ) -> Vec<RichNode> {
        let content = Content::from_nodes(self.children(id, depth, counter));
        vec![RichElement::Style(Style { content, ..style }).into()]
    }

    fn block(
        &self,
        id: NodeId,
        depth: usize,
        counter: &mut ListCounter,
        kind: BlockKind,
        n: Option<i64>,
    ) -> Vec<RichNode> {
        let content = Content::from_nodes(self.children(id, depth, counter));
        vec![RichElement::Block(Block { kind, n, content }).into()]
    }

    /// A user permalink becomes a mention when the user's name is known;
    /// otherwise a safe href becomes a link and anything else is dropped,
    /// keeping the text.
    fn anchor(&self, element: &Element, content: Vec<RichNode>) -> Vec<RichNode> {
        let Some(href) = element.attribute("href") else {
            return content;
        };

        if let Some(user_id) = user_link_target(href) {
            if let Some(display_name) = self.refs.display_name(&user_id) {
                let player = self.refs.player_id(&user_id).map(PlayerMention::minecraft);
                let mention = Mention {
                    room: false,
                    user: Some(MentionedUser {
                        mxid: user_id,
                        display_name: display_name.to_string(),
                    }),
                    player,
                    content: Content::from_nodes(content),
                };
                return vec![RichElement::Mention(mention).into()];
            }
            log::debug!("Mention of {user_id} kept as a link");
        }

        if is_linkable(href) {
            let link = Link {
                href: href.to_string(),
                content: Content::from_nodes(content),
            };
            vec![RichElement::Link(link).into()]
        } else {
            content
        }
    }

    fn image(&self, element: &Element) -> RichElement {
        let src = element
            .attribute("src")
            .filter(|src| parse_content_uri(src).is_some())
            .and_then(|src| self.refs.media_url(src))
            .map(str::to_string);
        let carried = |name: &str| {
            element
                .attribute(name)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        RichElement::Image(Image {
            src,
            alt: carried("alt"),
            title: carried("title"),
        })
    }
}

/// Leading integer of an attribute value, ignoring leading whitespace and
/// any trailing junk: `" 5th"` is 5.
fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}
