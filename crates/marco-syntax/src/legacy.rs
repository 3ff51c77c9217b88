//! Lexer for legacy game formatting codes.
//!
//! Game chat encodes color and style changes inline: the escape marker `§`
//! followed by a single code character. A marker followed by a line
//! terminator, or by nothing at all, is not a code and is reported as
//! [`FormatToken::Marker`].

use logos::Logos;

/// The escape marker that introduces a formatting code.
pub const ESCAPE_MARKER: char = '\u{a7}';

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTokenKind {
    /// Marker followed by any character that does not end a line
    #[regex("\u{a7}[^\n\r\u{2028}\u{2029}]")]
    Code,

    /// A marker that is not followed by a code character
    #[token("\u{a7}")]
    Marker,

    /// Text between markers
    #[regex("[^\u{a7}]+")]
    Literal,
}

/// A token of legacy-coded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatToken<'a> {
    /// The character following an escape marker, as written.
    Code(char),
    /// A stray escape marker.
    Marker,
    Literal(&'a str),
}

impl FormatToken<'_> {
    /// Length of the source text this token covers, in bytes.
    pub fn source_len(&self) -> usize {
        match self {
            FormatToken::Code(code) => ESCAPE_MARKER.len_utf8() + code.len_utf8(),
            FormatToken::Marker => ESCAPE_MARKER.len_utf8(),
            FormatToken::Literal(text) => text.len(),
        }
    }
}

/// Lex legacy-coded text into codes, stray markers and literal runs.
pub fn lex_format(input: &str) -> Vec<FormatToken<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = FormatTokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let token = match result {
            Ok(FormatTokenKind::Code) => match text.chars().nth(1) {
                Some(code) => FormatToken::Code(code),
                None => FormatToken::Marker,
            },
            Ok(FormatTokenKind::Marker) => FormatToken::Marker,
            Ok(FormatTokenKind::Literal) | Err(()) => FormatToken::Literal(text),
        };
        tokens.push(token);
    }

    tokens
}
