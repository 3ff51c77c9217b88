//! # marco-syntax
//!
//! Tokenizers for the two text formats a chat bridge has to read: the HTML
//! subset chat clients put in formatted message bodies, and the legacy
//! `§`-prefixed formatting codes used by game chat.
//!
//! Both tokenizers are generated with [Logos] and share one property: **every
//! byte of the input appears in exactly one token**. Nothing is skipped, so
//! callers decide what to drop (comments, stray markers) rather than the
//! lexer.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Markup
//!
//! ```
//! use marco_syntax::markup::{lex_markup, MarkupToken};
//!
//! let tokens = lex_markup(r#"<a href="x">hi</a>"#);
//! assert!(matches!(tokens[0], MarkupToken::StartTag { name: "a", .. }));
//! assert_eq!(tokens[1], MarkupToken::Text("hi"));
//! ```
//!
//! The markup lexer is context-free. It does not know which elements are void
//! or which end tags are stray; building a tree is the engine's job.
//!
//! ## Legacy formatting codes
//!
//! ```
//! use marco_syntax::legacy::{lex_format, FormatToken};
//!
//! let tokens = lex_format("§lbold");
//! assert_eq!(tokens, vec![FormatToken::Code('l'), FormatToken::Literal("bold")]);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! marco-syntax/
//! ├── lib.rs      # This file
//! ├── markup.rs   # Tags, text and declarations, plus attribute splitting
//! └── legacy.rs   # Escape marker + code pairs and literal runs
//! ```

pub mod legacy;
pub mod markup;

pub use legacy::{FormatToken, lex_format};
pub use markup::{Attribute, MarkupToken, lex_markup};
