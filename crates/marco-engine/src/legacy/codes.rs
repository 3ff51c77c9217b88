//! Meaning of the character after a `§` escape marker.

/// Markup tags the legacy style codes map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTag {
    Bold,
    Strike,
    Underline,
    Italic,
}

impl StyleTag {
    pub fn name(self) -> &'static str {
        match self {
            StyleTag::Bold => "b",
            StyleTag::Strike => "strike",
            StyleTag::Underline => "u",
            StyleTag::Italic => "i",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCode {
    /// `0`-`9`, `a`-`f`: a palette index.
    Color(u8),
    /// `l`, `m`, `n`, `o`
    Style(StyleTag),
    /// `k`: scrambled text, which chat cannot show.
    Obfuscated,
    /// `r`
    Reset,
    Unknown(char),
}

impl FormatCode {
    /// Case-insensitive.
    pub fn from_char(code: char) -> Self {
        let lower = code.to_ascii_lowercase();
        if let Some(nibble) = lower.to_digit(16) {
            return FormatCode::Color(nibble as u8);
        }
        match lower {
            'l' => FormatCode::Style(StyleTag::Bold),
            'm' => FormatCode::Style(StyleTag::Strike),
            'n' => FormatCode::Style(StyleTag::Underline),
            'o' => FormatCode::Style(StyleTag::Italic),
            'k' => FormatCode::Obfuscated,
            'r' => FormatCode::Reset,
            _ => FormatCode::Unknown(code),
        }
    }

    /// Whether the code closes every open tag before taking effect.
    pub fn resets(self) -> bool {
        matches!(self, FormatCode::Color(_) | FormatCode::Reset)
    }
}

/// 24-bit RGB for a palette index.
///
/// Bits 0 to 2 each add `0xAA` to blue, green and red, bit 3 adds `0x55` to
/// all three. Index 6 is gold rather than the dark yellow the bits give.
pub fn legacy_color(nibble: u8) -> u32 {
    let mut color = 0;
    if nibble & 0x1 != 0 {
        color |= 0x0000aa;
    }
    if nibble & 0x2 != 0 {
        color |= 0x00aa00;
    }
    if nibble & 0x4 != 0 {
        color |= 0xaa0000;
    }
    if nibble & 0x8 != 0 {
        color |= 0x555555;
    }
    if nibble == 6 {
        color |= 0xff0000;
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x0, 0x000000)]
    #[case(0x1, 0x0000aa)]
    #[case(0x2, 0x00aa00)]
    #[case(0x3, 0x00aaaa)]
    #[case(0x4, 0xaa0000)]
    #[case(0x5, 0xaa00aa)]
    #[case(0x6, 0xffaa00)]
    #[case(0x7, 0xaaaaaa)]
    #[case(0x8, 0x555555)]
    #[case(0x9, 0x5555ff)]
    #[case(0xa, 0x55ff55)]
    #[case(0xb, 0x55ffff)]
    #[case(0xc, 0xff5555)]
    #[case(0xd, 0xff55ff)]
    #[case(0xe, 0xffff55)]
    #[case(0xf, 0xffffff)]
    fn palette(#[case] nibble: u8, #[case] expected: u32) {
        assert_eq!(legacy_color(nibble), expected);
    }

    #[rstest]
    #[case('0', FormatCode::Color(0))]
    #[case('a', FormatCode::Color(10))]
    #[case('F', FormatCode::Color(15))]
    #[case('L', FormatCode::Style(StyleTag::Bold))]
    #[case('m', FormatCode::Style(StyleTag::Strike))]
    #[case('n', FormatCode::Style(StyleTag::Underline))]
    #[case('O', FormatCode::Style(StyleTag::Italic))]
    #[case('k', FormatCode::Obfuscated)]
    #[case('R', FormatCode::Reset)]
    #[case('z', FormatCode::Unknown('z'))]
    #[case('§', FormatCode::Unknown('§'))]
    fn interprets_codes(#[case] code: char, #[case] expected: FormatCode) {
        assert_eq!(FormatCode::from_char(code), expected);
    }
}
