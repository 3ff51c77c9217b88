//! # Resolvers
//!
//! The lookups translation depends on but cannot answer itself: who a user
//! is, whether they are a bridged player, where an uploaded file lives, and
//! whether a sender may notify a whole room.
//!
//! [`Resolver`] is the seam. Implementations backed by a live homeserver
//! belong to the service; this module provides the offline pieces:
//!
//! - [`AppserviceUsers`]: recognises the bridge's puppet users
//! - [`HomeserverMedia`]: turns content URIs into download URLs
//! - [`PowerLevels`]: room power-level content and the `@room` rule
//! - [`StaticResolver`]: all of the above plus a fixed display-name table

use std::collections::HashMap;
use std::future::Future;

pub mod media;
pub mod power_levels;
pub mod users;

pub use media::HomeserverMedia;
pub use power_levels::{NotificationLevels, PowerLevels};
pub use users::AppserviceUsers;

/// Lookups used while translating a message.
///
/// A lookup that fails is reported the same as one that finds nothing;
/// translation degrades instead of erroring.
pub trait Resolver: Sync {
    /// Display name of `user_id` as seen in `room_id`.
    fn display_name(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Option<String>> + Send;

    /// Id of the game player a chat user stands in for.
    fn player_id(&self, user_id: &str) -> Option<String>;

    /// Fetchable URL for an `mxc://` content URI.
    fn media_url(&self, content_uri: &str) -> Option<String>;

    /// Whether `sender` may mention everyone in `room_id`.
    fn can_mention_room(&self, room_id: &str, sender: &str) -> impl Future<Output = bool> + Send;
}

/// A [`Resolver`] answering from memory.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    pub users: Option<AppserviceUsers>,
    pub media: Option<HomeserverMedia>,
    /// Keyed by user id; the same name applies in every room.
    pub display_names: HashMap<String, String>,
    /// Keyed by room id.
    pub power_levels: HashMap<String, PowerLevels>,
}

impl StaticResolver {
    pub fn new(users: AppserviceUsers, media: HomeserverMedia) -> Self {
        Self {
            users: Some(users),
            media: Some(media),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, user_id: &str, name: &str) -> Self {
        self.display_names
            .insert(user_id.to_string(), name.to_string());
        self
    }

    pub fn with_power_levels(mut self, room_id: &str, power_levels: PowerLevels) -> Self {
        self.power_levels.insert(room_id.to_string(), power_levels);
        self
    }
}

impl Resolver for StaticResolver {
    async fn display_name(&self, _room_id: &str, user_id: &str) -> Option<String> {
        self.display_names.get(user_id).cloned()
    }

    fn player_id(&self, user_id: &str) -> Option<String> {
        self.users.as_ref()?.player_id(user_id)
    }

    fn media_url(&self, content_uri: &str) -> Option<String> {
        self.media.as_ref()?.download_url(content_uri)
    }

    async fn can_mention_room(&self, room_id: &str, sender: &str) -> bool {
        self.power_levels
            .get(room_id)
            .is_some_and(|levels| levels.can_notify_room(sender))
    }
}
