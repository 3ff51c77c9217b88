use super::content::MessageType;

/// The line shown in game chat for a chat-network message.
///
/// Message types other than text, notice and emote are not relayed.
pub fn chat_line(msgtype: &MessageType, name: &str, body: &str) -> Option<String> {
    match msgtype {
        MessageType::Text | MessageType::Notice => Some(format!("<{name}> {body}")),
        MessageType::Emote => Some(format!(" * <{name}> {body}")),
        MessageType::Other(kind) => {
            log::debug!("Not relaying {kind} message from {name}");
            None
        }
    }
}

/// A message from the bridge itself rather than a user.
pub fn announcement(body: &str) -> String {
    format!("[Server] {body}")
}
