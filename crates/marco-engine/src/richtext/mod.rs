//! # Rich text
//!
//! The normalized document produced from chat markup, and the walker that
//! produces it.
//!
//! - **`model`**: serde-tagged node types (`style`, `link`, `mention`, `img`,
//!   `block`, `horizontalRule`) and the [`Content`] normalization rule
//! - **`walk`**: tag dispatch from a laid-out markup tree
//! - **`refs`**: the collect-then-resolve step that keeps the walk synchronous
//! - **`color`**, **`links`**: attribute and URL recognisers

pub mod color;
pub mod links;
pub mod model;
pub mod refs;
pub mod walk;

pub use color::parse_html_color;
pub use model::{
    Block, BlockKind, Content, GameBridge, Image, Link, Mention, MentionedUser, PlayerMention,
    PlayerRef, ROOM_MENTION, RichElement, RichNode, Style,
};
pub use refs::{References, ResolvedRefs};
pub use walk::{DEFAULT_MAX_DEPTH, WalkOptions, split_room_mentions, walk};
