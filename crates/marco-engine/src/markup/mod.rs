//! # Markup
//!
//! The in-memory form of a formatted chat message: an arena tree of elements
//! and text built by a tolerant parser for the HTML subset chat clients send.
//!
//! - **`tag`**: the closed set of element names the engine understands
//! - **`tree`**: arena storage with in-place editing used by the layout pass
//! - **`parse`**: tree construction from `marco-syntax` tokens
//! - **`snapshot`**: compact JSON projection for tests and debugging

pub mod parse;
pub mod snapshot;
pub mod tag;
pub mod tree;

pub use parse::{MAX_NESTING, parse_markup};
pub use snapshot::snapshot;
pub use tag::Tag;
pub use tree::{Element, MarkupTree, Node, NodeId};
