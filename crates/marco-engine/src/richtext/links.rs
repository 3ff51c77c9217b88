//! Recognisers for the URLs that get special treatment in messages.

use std::sync::OnceLock;

use regex::Regex;

/// Prefix of a permalink to a chat-network entity.
pub const PERMALINK_PREFIX: &str = "https://matrix.to/#/";

static LINK_SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();

/// The user id a permalink points at, when it points at a user.
///
/// `https://matrix.to/#/@alice:example.com` and its percent-encoded form both
/// yield `@alice:example.com`; room and event permalinks yield `None`.
pub fn user_link_target(href: &str) -> Option<String> {
    let rest = href.strip_prefix(PERMALINK_PREFIX)?;
    let end = rest.find(['/', '?']).unwrap_or(rest.len());
    let decoded = urlencoding::decode(&rest[..end]).ok()?;
    let (localpart, server) = decoded.strip_prefix('@')?.split_once(':')?;
    if localpart.is_empty() || server.is_empty() {
        return None;
    }
    Some(decoded.into_owned())
}

/// Permalink to a user, with the id percent-encoded where needed.
pub fn user_link(user_id: &str) -> String {
    let encoded = urlencoding::encode(user_id).replace("%40", "@").replace("%3A", ":");
    format!("{PERMALINK_PREFIX}{encoded}")
}

/// Whether an href uses a scheme that is safe to pass on as a link.
pub fn is_linkable(href: &str) -> bool {
    LINK_SCHEME_REGEX
        .get_or_init(|| {
            Regex::new(r"(?i)^(https?|ftp|mailto|magnet):").expect("Invalid link scheme regex")
        })
        .is_match(href)
}

/// Split an `mxc://server/media-id` content reference into its parts.
pub fn parse_content_uri(uri: &str) -> Option<(&str, &str)> {
    let (server, media_id) = uri.strip_prefix("mxc://")?.split_once('/')?;
    let valid = |part: &str| !part.is_empty() && !part.contains(['/', '?', '#']);
    (valid(server) && valid(media_id)).then_some((server, media_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("https://matrix.to/#/@test:example.com", Some("@test:example.com"))]
    #[case("https://matrix.to/#/%40test%3Aexample.com", Some("@test:example.com"))]
    #[case("https://matrix.to/#/@test:example.com?via=example.com", Some("@test:example.com"))]
    #[case("https://matrix.to/#/!room:example.com/$event?via=example.com", None)]
    #[case("https://matrix.to/#/#alias:example.com", None)]
    #[case("https://matrix.to/#/@nobody", None)]
    #[case("https://example.com/#/@test:example.com", None)]
    fn recognises_user_links(#[case] href: &str, #[case] expected: Option<&str>) {
        assert_eq!(user_link_target(href).as_deref(), expected);
    }

    #[test]
    fn user_link_round_trips() {
        let link = user_link("@_mc_bot:example.com");
        assert_eq!(link, "https://matrix.to/#/@_mc_bot:example.com");
        assert_eq!(user_link_target(&link).as_deref(), Some("@_mc_bot:example.com"));
    }

    #[rstest]
    #[case("https://example.com", true)]
    #[case("HTTP://example.com", true)]
    #[case("ftp://example.com", true)]
    #[case("mailto:a@example.com", true)]
    #[case("magnet:?xt=urn:btih:abc", true)]
    #[case("javascript:alert(1)", false)]
    #[case("example.com", false)]
    #[case("", false)]
    fn linkable_schemes(#[case] href: &str, #[case] expected: bool) {
        assert_eq!(is_linkable(href), expected);
    }

    #[rstest]
    #[case("mxc://example.com/1", Some(("example.com", "1")))]
    #[case("mxc://example.com/", None)]
    #[case("mxc://example.com/a/b", None)]
    #[case("https://example.com/1", None)]
    fn content_uris(#[case] uri: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(parse_content_uri(uri), expected);
    }
}
