//! Rich-text translation between chat-network markup and game chat.
//!
//! Incoming messages go markup → [`markup::parse_markup`] → [`layout`] →
//! [`richtext::walk`]; outgoing game chat goes through [`legacy::encode`].
//! [`translate`] strings those together behind a [`resolve::Resolver`].

pub mod error;
pub mod layout;
pub mod legacy;
pub mod markup;
pub mod relay;
pub mod resolve;
pub mod richtext;
pub mod translate;

// Re-export key types for easier usage
pub use error::EventError;
pub use legacy::{Encoded, encode};
pub use relay::{MessageContent, MessageType, death_notice};
pub use resolve::{AppserviceUsers, HomeserverMedia, PowerLevels, Resolver, StaticResolver};
pub use richtext::{Content, RichElement, RichNode};
pub use translate::{
    IncomingMessage, TranslateOptions, Translation, translate_incoming, translate_markup,
    translate_outgoing,
};
