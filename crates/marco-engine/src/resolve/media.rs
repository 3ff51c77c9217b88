use crate::richtext::links::parse_content_uri;

/// Download URLs on a homeserver's media repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeserverMedia {
    homeserver_url: String,
}

impl HomeserverMedia {
    pub fn new(homeserver_url: impl Into<String>) -> Self {
        let mut homeserver_url = homeserver_url.into();
        while homeserver_url.ends_with('/') {
            homeserver_url.pop();
        }
        Self { homeserver_url }
    }

    /// `mxc://<server>/<id>` becomes
    /// `<homeserver>/_matrix/media/r0/download/<server>/<id>`.
    pub fn download_url(&self, content_uri: &str) -> Option<String> {
        let (server, media_id) = parse_content_uri(content_uri)?;
        Some(format!(
            "{}/_matrix/media/r0/download/{server}/{media_id}",
            self.homeserver_url
        ))
    }
}
