use std::sync::OnceLock;

use regex::Regex;

static HTML_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();

/// Parse `#rgb` or `#rrggbb` (any case) into 24-bit RGB.
///
/// The short form repeats each digit, so `#abc` is `0xaabbcc`.
pub fn parse_html_color(value: &str) -> Option<u32> {
    let regex = HTML_COLOR_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^#([0-9a-f]{3}|[0-9a-f]{6})$").expect("Invalid color regex")
    });
    let digits = regex.captures(value)?.get(1)?.as_str();
    let rgb = u32::from_str_radix(digits, 16).ok()?;

    if digits.len() == 3 {
        let r = (rgb >> 8) & 0xf;
        let g = (rgb >> 4) & 0xf;
        let b = rgb & 0xf;
        Some((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11)
    } else {
        Some(rgb)
    }
}
