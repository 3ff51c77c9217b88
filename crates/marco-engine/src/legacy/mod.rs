//! # Legacy formatting codes
//!
//! Converts game chat text carrying `§` formatting codes into a plain body
//! and, when any styling applies, an equivalent chat markup string.
//!
//! Tags are opened lazily: a code only queues its tag, and the queue is
//! written out when the next literal text arrives. Codes with no text after
//! them therefore produce no empty elements.
//!
//! Colors do not nest. A color code closes everything open, styles included,
//! before queuing its `<font>`:
//!
//! ```
//! use marco_engine::legacy::encode;
//!
//! let encoded = encode("§lbold §4red");
//! assert_eq!(encoded.plain_body, "bold red");
//! assert_eq!(
//!     encoded.markup.as_deref(),
//!     Some(r##"<b>bold </b><font color="#aa0000">red</font>"##)
//! );
//! ```
//!
//! Repeating a style code while that style is open queues it again, so
//! `§l1§l2` nests two `<b>` elements. Receiving clients render the result
//! the same way.

pub mod codes;

use html_escape::encode_quoted_attribute;
use marco_syntax::legacy::{FormatToken, lex_format};

use crate::relay::content::{MessageContent, MessageType};
pub use codes::{FormatCode, StyleTag, legacy_color};

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// The text with every code removed.
    pub plain_body: String,
    /// Present only when some text was written inside a tag.
    pub markup: Option<String>,
}

impl Encoded {
    /// Message content of the given type carrying this text.
    pub fn into_content(self, msgtype: MessageType) -> MessageContent {
        MessageContent::new(msgtype, self.plain_body, self.markup)
    }
}

/// Encode legacy-coded text. Never fails; stray markers are dropped.
pub fn encode(legacy: &str) -> Encoded {
    let mut writer = MarkupWriter::default();
    for token in lex_format(legacy) {
        match token {
            FormatToken::Code(code) => writer.code(FormatCode::from_char(code)),
            FormatToken::Marker => {}
            FormatToken::Literal(text) => writer.literal(text),
        }
    }
    writer.finish()
}

/// Escape `&`, `<`, `>`, quotes and backticks.
fn escape_markup(text: &str) -> String {
    encode_quoted_attribute(text).replace('`', "&#x60;")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenTag {
    Font(u32),
    Style(StyleTag),
}

impl OpenTag {
    fn name(self) -> &'static str {
        match self {
            OpenTag::Font(_) => "font",
            OpenTag::Style(style) => style.name(),
        }
    }

    fn write_open(self, out: &mut String) {
        match self {
            OpenTag::Font(color) => out.push_str(&format!("<font color=\"#{color:06x}\">")),
            OpenTag::Style(style) => {
                out.push('<');
                out.push_str(style.name());
                out.push('>');
            }
        }
    }
}

#[derive(Debug, Default)]
struct MarkupWriter {
    markup: String,
    body: String,
    /// Tags written and not yet closed, outermost first.
    open: Vec<OpenTag>,
    /// Tags to write before the next literal.
    pending: Vec<OpenTag>,
    used_formatting: bool,
}

impl MarkupWriter {
    fn code(&mut self, code: FormatCode) {
        if code.resets() {
            self.pending.clear();
            self.close_all();
        }
        match code {
            FormatCode::Color(nibble) => {
                self.pending = vec![OpenTag::Font(legacy_color(nibble))];
            }
            FormatCode::Style(style) => {
                let tag = OpenTag::Style(style);
                if !(self.pending.contains(&tag) && self.open.contains(&tag)) {
                    self.pending.push(tag);
                }
            }
            FormatCode::Obfuscated | FormatCode::Reset | FormatCode::Unknown(_) => {}
        }
    }

    fn literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        for tag in self.pending.drain(..) {
            tag.write_open(&mut self.markup);
            self.open.push(tag);
        }
        if !self.open.is_empty() {
            self.used_formatting = true;
        }
        self.markup.push_str(&escape_markup(text));
        self.body.push_str(text);
    }

    fn close_all(&mut self) {
        while let Some(tag) = self.open.pop() {
            self.markup.push_str("</");
            self.markup.push_str(tag.name());
            self.markup.push('>');
        }
    }

    fn finish(mut self) -> Encoded {
        let markup = if self.used_formatting {
            self.close_all();
            Some(self.markup)
        } else {
            None
        };
        Encoded {
            plain_body: self.body,
            markup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", "", None)]
    #[case("1", "1", None)]
    // escaping
    #[case("§l1<>&\"'", "1<>&\"'", Some("<b>1&lt;&gt;&amp;&quot;&#x27;</b>"))]
    #[case("1<>&", "1<>&", None)]
    #[case("§l`1`", "`1`", Some("<b>&#x60;1&#x60;</b>"))]
    // colors
    #[case("1§02", "12", Some(r##"1<font color="#000000">2</font>"##))]
    #[case("1§12", "12", Some(r##"1<font color="#0000aa">2</font>"##))]
    #[case("1§22", "12", Some(r##"1<font color="#00aa00">2</font>"##))]
    #[case("1§32", "12", Some(r##"1<font color="#00aaaa">2</font>"##))]
    #[case("1§42", "12", Some(r##"1<font color="#aa0000">2</font>"##))]
    #[case("1§52", "12", Some(r##"1<font color="#aa00aa">2</font>"##))]
    #[case("1§62", "12", Some(r##"1<font color="#ffaa00">2</font>"##))]
    #[case("1§72", "12", Some(r##"1<font color="#aaaaaa">2</font>"##))]
    #[case("1§82", "12", Some(r##"1<font color="#555555">2</font>"##))]
    #[case("1§92", "12", Some(r##"1<font color="#5555ff">2</font>"##))]
    #[case("1§a2", "12", Some(r##"1<font color="#55ff55">2</font>"##))]
    #[case("1§A2", "12", Some(r##"1<font color="#55ff55">2</font>"##))]
    #[case("1§b2", "12", Some(r##"1<font color="#55ffff">2</font>"##))]
    #[case("1§B2", "12", Some(r##"1<font color="#55ffff">2</font>"##))]
    #[case("1§c2", "12", Some(r##"1<font color="#ff5555">2</font>"##))]
    #[case("1§C2", "12", Some(r##"1<font color="#ff5555">2</font>"##))]
    #[case("1§d2", "12", Some(r##"1<font color="#ff55ff">2</font>"##))]
    #[case("1§D2", "12", Some(r##"1<font color="#ff55ff">2</font>"##))]
    #[case("1§e2", "12", Some(r##"1<font color="#ffff55">2</font>"##))]
    #[case("1§E2", "12", Some(r##"1<font color="#ffff55">2</font>"##))]
    #[case("1§f2", "12", Some(r##"1<font color="#ffffff">2</font>"##))]
    #[case("1§F2", "12", Some(r##"1<font color="#ffffff">2</font>"##))]
    // styles
    #[case("1§k2", "12", None)]
    #[case("1§K2", "12", None)]
    #[case("1§l2", "12", Some("1<b>2</b>"))]
    #[case("1§L2", "12", Some("1<b>2</b>"))]
    #[case("1§m2", "12", Some("1<strike>2</strike>"))]
    #[case("1§M2", "12", Some("1<strike>2</strike>"))]
    #[case("1§n2", "12", Some("1<u>2</u>"))]
    #[case("1§N2", "12", Some("1<u>2</u>"))]
    #[case("1§o2", "12", Some("1<i>2</i>"))]
    #[case("1§O2", "12", Some("1<i>2</i>"))]
    // unknown codes and stray markers
    #[case("1§z2", "12", None)]
    #[case("1§", "1", None)]
    #[case("1§\n2", "1\n2", None)]
    // reset
    #[case("§1§k§l§m§n§o§r1", "1", None)]
    #[case("§l1§r2", "12", Some("<b>1</b>2"))]
    // colors reset styles
    #[case("§k§l§m§n§o§11", "1", Some(r##"<font color="#0000aa">1</font>"##))]
    #[case(
        "§k§l§m§n§o1§12",
        "12",
        Some(r##"<b><strike><u><i>1</i></u></strike></b><font color="#0000aa">2</font>"##)
    )]
    // one color per letter
    #[case(
        "§4r§6a§ei§2n§1b§5o§dw",
        "rainbow",
        Some(concat!(
            r##"<font color="#aa0000">r</font>"##,
            r##"<font color="#ffaa00">a</font>"##,
            r##"<font color="#ffff55">i</font>"##,
            r##"<font color="#00aa00">n</font>"##,
            r##"<font color="#0000aa">b</font>"##,
            r##"<font color="#aa00aa">o</font>"##,
            r##"<font color="#ff55ff">w</font>"##,
        ))
    )]
    // styles stack inside a color
    #[case(
        "1§12§k3§l4§m5§n6§o7",
        "1234567",
        Some(r##"1<font color="#0000aa">23<b>4<strike>5<u>6<i>7</i></u></strike></b></font>"##)
    )]
    // repeated codes nest rather than merge
    #[case("1§l§l2", "12", Some("1<b><b>2</b></b>"))]
    #[case("1§l2§l3", "123", Some("1<b>2<b>3</b></b>"))]
    #[case(
        "1§12§13",
        "123",
        Some(r##"1<font color="#0000aa">2</font><font color="#0000aa">3</font>"##)
    )]
    fn encodes(#[case] legacy: &str, #[case] body: &str, #[case] markup: Option<&str>) {
        let encoded = encode(legacy);
        assert_eq!(encoded.plain_body, body);
        assert_eq!(encoded.markup.as_deref(), markup);
    }

    #[test]
    fn trailing_codes_open_nothing() {
        insta::assert_snapshot!(
            encode("§lbold§4§n").markup.unwrap_or_default(),
            @"<b>bold</b>"
        );
    }

    #[test]
    fn into_content_sets_format_only_with_markup() {
        let plain = encode("hi").into_content(MessageType::Text);
        assert_eq!(plain.format, None);
        assert_eq!(plain.formatted_body, None);

        let styled = encode("§lhi").into_content(MessageType::Text);
        assert_eq!(styled.format.as_deref(), Some("org.matrix.custom.html"));
        assert_eq!(styled.formatted_body.as_deref(), Some("<b>hi</b>"));
        assert_eq!(styled.body, "hi");
    }
}
