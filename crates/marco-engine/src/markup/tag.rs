use std::fmt;

/// Element names the engine distinguishes. Anything else is kept as
/// [`Tag::Other`] and treated as a transparent container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Root of a parsed document. Never produced from markup.
    Fragment,
    A,
    B,
    Blockquote,
    Br,
    Caption,
    Code,
    Del,
    Div,
    Em,
    Font,
    /// `h1` through `h6`
    Heading(u8),
    Hr,
    I,
    Img,
    Li,
    Ol,
    P,
    Pre,
    Span,
    Strike,
    Strong,
    Sub,
    Sup,
    Table,
    Tbody,
    Td,
    Th,
    Thead,
    Tr,
    U,
    Ul,
    /// Lowercased name of an element outside the known set.
    Other(String),
}

impl Tag {
    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "a" => Tag::A,
            "b" => Tag::B,
            "blockquote" => Tag::Blockquote,
            "br" => Tag::Br,
            "caption" => Tag::Caption,
            "code" => Tag::Code,
            "del" => Tag::Del,
            "div" => Tag::Div,
            "em" => Tag::Em,
            "font" => Tag::Font,
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "hr" => Tag::Hr,
            "i" => Tag::I,
            "img" => Tag::Img,
            "li" => Tag::Li,
            "ol" => Tag::Ol,
            "p" => Tag::P,
            "pre" => Tag::Pre,
            "span" => Tag::Span,
            "strike" => Tag::Strike,
            "strong" => Tag::Strong,
            "sub" => Tag::Sub,
            "sup" => Tag::Sup,
            "table" => Tag::Table,
            "tbody" => Tag::Tbody,
            "td" => Tag::Td,
            "th" => Tag::Th,
            "thead" => Tag::Thead,
            "tr" => Tag::Tr,
            "u" => Tag::U,
            "ul" => Tag::Ul,
            _ => Tag::Other(lower),
        }
    }

    /// Uppercase element name, as used in debug output.
    pub fn name(&self) -> String {
        match self {
            Tag::Fragment => String::new(),
            Tag::Heading(level) => format!("H{level}"),
            Tag::Other(name) => name.to_ascii_uppercase(),
            known => format!("{known:?}").to_ascii_uppercase(),
        }
    }

    /// Inline ("phrasing") elements flow inside a paragraph instead of
    /// starting one.
    pub fn is_phrasing(&self) -> bool {
        matches!(
            self,
            Tag::A
                | Tag::B
                | Tag::Br
                | Tag::Code
                | Tag::Del
                | Tag::Em
                | Tag::Font
                | Tag::I
                | Tag::Img
                | Tag::Span
                | Tag::Strike
                | Tag::Strong
                | Tag::Sub
                | Tag::Sup
                | Tag::U
        )
    }

    /// Elements that are content in their own right even with no children.
    pub fn allows_empty(&self) -> bool {
        matches!(self, Tag::Img | Tag::Hr | Tag::Li)
    }

    /// Elements that never have children.
    pub fn is_void(&self) -> bool {
        match self {
            Tag::Br | Tag::Hr | Tag::Img => true,
            Tag::Other(name) => matches!(
                name.as_str(),
                "area"
                    | "base"
                    | "col"
                    | "embed"
                    | "input"
                    | "link"
                    | "meta"
                    | "param"
                    | "source"
                    | "track"
                    | "wbr"
            ),
            _ => false,
        }
    }

    /// Elements whose contents are dropped along with them.
    pub fn is_raw_text(&self) -> bool {
        matches!(self, Tag::Other(name) if matches!(name.as_str(), "script" | "style" | "noscript"))
    }

    /// Whether opening `incoming` implicitly closes an open `self`.
    pub fn closed_by(&self, incoming: &Tag) -> bool {
        match (self, incoming) {
            (Tag::Li, Tag::Li) => true,
            (Tag::P, Tag::P | Tag::Div) => true,
            (Tag::Td | Tag::Th, Tag::Td | Tag::Th) => true,
            (Tag::Heading(open), Tag::Heading(next)) => open == next,
            _ => false,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
