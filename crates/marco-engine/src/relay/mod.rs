//! # Relay
//!
//! What the bridge sends across once translation is done: chat-network
//! message content, the lines printed in game chat, and death notices
//! posted back to the room.

pub mod chat;
pub mod content;
pub mod death;

pub use chat::{announcement, chat_line};
pub use content::{HTML_FORMAT, MessageContent, MessageType};
pub use death::death_notice;
