//! Lexer for the HTML subset found in formatted chat messages.
//!
//! The lexer recognises four shapes:
//!
//! - start tags, with their attributes (`<a href="...">`, `<br/>`)
//! - end tags (`</a>`)
//! - declarations: comments, doctypes and processing instructions
//! - text, including any `<` that does not begin one of the above
//!
//! Entity references are left untouched in both text and attribute values;
//! decoding belongs to the tree builder, which knows where a value ends.

use std::sync::OnceLock;

use logos::{Lexer, Logos};
use regex::Regex;

static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupTokenKind {
    /// `<name attr="value" flag>` or `<name/>`
    #[regex(r#"<[A-Za-z][A-Za-z0-9:_-]*([\s/]+[^\s/>"'=]+(\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+))?)*[\s/]*>"#)]
    StartTag,

    /// `</name>`, tolerating junk before the closing `>`
    #[regex(r"</[A-Za-z][A-Za-z0-9:_-]*[^>]*>")]
    EndTag,

    /// `<!-- ... -->`, `<!DOCTYPE ...>`, `<? ... >`
    #[token("<!", declaration)]
    #[token("<?", declaration)]
    Declaration,

    /// A `<` that opens nothing
    #[token("<")]
    Lt,

    #[regex(r"[^<]+")]
    Text,
}

/// Consume the rest of a declaration. Comments run to `-->`, everything
/// else to the next `>`; an unterminated one runs to the end of input.
fn declaration(lex: &mut Lexer<MarkupTokenKind>) -> bool {
    let remainder = lex.remainder();
    let terminator = if remainder.starts_with("--") { "-->" } else { ">" };
    let consumed = remainder
        .find(terminator)
        .map(|at| at + terminator.len())
        .unwrap_or(remainder.len());
    lex.bump(consumed);
    true
}

/// An attribute as written in a start tag. `value` is `None` for a bare
/// attribute such as `data-mx-spoiler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken<'a> {
    StartTag {
        name: &'a str,
        attributes: Vec<Attribute<'a>>,
        self_closing: bool,
    },
    EndTag {
        name: &'a str,
    },
    Declaration(&'a str),
    Text(&'a str),
}

/// Lex the input into tags, declarations and text.
///
/// Text runs are not merged: `a < b` yields three text tokens. Concatenating
/// the source slices of all tokens gives back the input.
pub fn lex_markup(input: &str) -> Vec<MarkupToken<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = MarkupTokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let token = match result {
            Ok(MarkupTokenKind::StartTag) => start_tag(text),
            Ok(MarkupTokenKind::EndTag) => MarkupToken::EndTag {
                name: tag_name(&text[2..]),
            },
            Ok(MarkupTokenKind::Declaration) => MarkupToken::Declaration(text),
            Ok(MarkupTokenKind::Lt) | Ok(MarkupTokenKind::Text) | Err(()) => {
                MarkupToken::Text(text)
            }
        };
        tokens.push(token);
    }

    tokens
}

/// Leading run of tag-name characters.
fn tag_name(text: &str) -> &str {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-')))
        .unwrap_or(text.len());
    &text[..end]
}

fn start_tag(text: &str) -> MarkupToken<'_> {
    // Strip `<` and `>`; the regex guarantees both are present.
    let inner = &text[1..text.len() - 1];
    let name = tag_name(inner);
    let rest = &inner[name.len()..];
    MarkupToken::StartTag {
        name,
        attributes: parse_attributes(rest),
        self_closing: rest.trim_end().ends_with('/'),
    }
}

/// Split the attribute section of a start tag into name/value pairs.
///
/// Quotes are removed from quoted values. Stray `/` characters between
/// attributes are ignored.
pub fn parse_attributes(text: &str) -> Vec<Attribute<'_>> {
    let regex = ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(r#"([^\s/>"'=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
            .expect("Invalid attribute regex")
    });

    regex
        .captures_iter(text)
        .filter_map(|captures| {
            let name = captures.get(1)?.as_str();
            let value = captures
                .get(2)
                .or_else(|| captures.get(3))
                .or_else(|| captures.get(4))
                .map(|m| m.as_str());
            Some(Attribute { name, value })
        })
        .collect()
}
