use html_escape::{encode_quoted_attribute, encode_text};

use super::content::{MessageContent, MessageType};
use crate::richtext::links::user_link;

/// Notice content for a player's death message.
///
/// When the message opens with one of `names` (tried in order), that prefix
/// becomes a link to `player_user_id`. Otherwise the message is sent as
/// plain text.
pub fn death_notice(message: &str, player_user_id: &str, names: &[&str]) -> MessageContent {
    let Some((name, rest)) = names
        .iter()
        .copied()
        .filter(|name| !name.is_empty())
        .find_map(|name| message.strip_prefix(name).map(|rest| (name, rest)))
    else {
        return MessageContent::new(MessageType::Notice, message, None);
    };

    let markup = format!(
        "<a href=\"{}\">{}</a>{}",
        encode_quoted_attribute(&user_link(player_user_id)),
        encode_text(name),
        encode_text(rest),
    );
    MessageContent::new(MessageType::Notice, message, Some(markup))
}
