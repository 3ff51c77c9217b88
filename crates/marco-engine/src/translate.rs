//! The two entry points the bridge calls: chat network to game, and game to
//! chat network.

use crate::layout::{DEFAULT_SEPARATOR, layout, simplify};
use crate::legacy::{Encoded, encode};
use crate::markup::parse_markup;
use crate::relay::chat::chat_line;
use crate::relay::content::{MessageContent, MessageType};
use crate::resolve::Resolver;
use crate::richtext::{
    Content, DEFAULT_MAX_DEPTH, References, ResolvedRefs, ROOM_MENTION, RichNode, WalkOptions,
    split_room_mentions, walk,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Inserted between paragraphs during layout.
    pub paragraph_separator: String,
    pub max_depth: usize,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            paragraph_separator: DEFAULT_SEPARATOR.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A message received from the chat network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingMessage<'a> {
    pub room_id: &'a str,
    pub sender: &'a str,
    pub body: &'a str,
    /// Formatted body, when the message carries chat markup.
    pub markup: Option<&'a str>,
}

impl<'a> IncomingMessage<'a> {
    pub fn from_content(room_id: &'a str, sender: &'a str, content: &'a MessageContent) -> Self {
        Self {
            room_id,
            sender,
            body: &content.body,
            markup: content.markup(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// Display name of the sender, or their user id.
    pub sender_name: String,
    pub plain_body: String,
    pub richtext: Option<Content>,
}

impl Translation {
    /// The line to print in game chat.
    pub fn chat_line(&self, msgtype: &MessageType) -> Option<String> {
        chat_line(msgtype, &self.sender_name, &self.plain_body)
    }
}

/// Translate a chat-network message for the game.
///
/// The room-mention privilege is only checked when `@room` appears in the
/// plain body. Markup alone cannot mention the room.
pub async fn translate_incoming<R: Resolver>(
    message: &IncomingMessage<'_>,
    resolver: &R,
    options: &TranslateOptions,
) -> Translation {
    let sender_name = resolver
        .display_name(message.room_id, message.sender)
        .await
        .unwrap_or_else(|| message.sender.to_string());

    let allow_room_mention = message.body.contains(ROOM_MENTION)
        && resolver.can_mention_room(message.room_id, message.sender).await;

    let richtext = match message.markup {
        Some(markup) => {
            let walk_options = WalkOptions {
                allow_room_mention,
                max_depth: options.max_depth,
            };
            translate_markup(markup, message.room_id, resolver, options, &walk_options).await
        }
        None if allow_room_mention => room_mentions(message.body),
        None => None,
    };

    Translation {
        sender_name,
        plain_body: message.body.to_string(),
        richtext,
    }
}

/// Parse, lay out and walk a formatted body.
pub async fn translate_markup<R: Resolver>(
    markup: &str,
    room_id: &str,
    resolver: &R,
    options: &TranslateOptions,
    walk_options: &WalkOptions,
) -> Option<Content> {
    let mut tree = parse_markup(markup);
    if !layout(&mut tree, &options.paragraph_separator) {
        log::debug!("Markup in {room_id} laid out to nothing");
        return None;
    }
    simplify(&mut tree);

    let references = References::collect(&tree, walk_options.max_depth);
    let resolved = ResolvedRefs::resolve(&references, room_id, resolver).await;
    walk(&tree, &resolved, walk_options)
}

/// Rich text for a plain body, present only when it mentions the room.
fn room_mentions(body: &str) -> Option<Content> {
    let nodes = split_room_mentions(body);
    nodes
        .iter()
        .any(|node| matches!(node, RichNode::Element(_)))
        .then(|| Content::from_nodes(nodes))
}

/// Translate game chat for the chat network.
pub fn translate_outgoing(legacy: &str) -> Encoded {
    encode(legacy)
}
