use uuid::Uuid;

/// The bridge's namespace of puppet users.
///
/// Each game player is represented on the chat network by
/// `@<prefix><id>:<server>`. Puppets this bridge creates use the player's
/// UUID as 32 hex digits; any other suffix in the namespace is passed on as
/// is. The bridge bot lives in the same namespace but is not a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppserviceUsers {
    user_prefix: String,
    bot_localpart: String,
    server_name: String,
}

impl AppserviceUsers {
    pub fn new(
        user_prefix: impl Into<String>,
        bot_localpart: impl Into<String>,
        server_name: impl Into<String>,
    ) -> Self {
        Self {
            user_prefix: user_prefix.into(),
            bot_localpart: bot_localpart.into(),
            server_name: server_name.into(),
        }
    }

    pub fn bot_user_id(&self) -> String {
        format!("@{}:{}", self.bot_localpart, self.server_name)
    }

    /// The puppet user standing in for a player.
    pub fn user_id_for_player(&self, uuid: &Uuid) -> String {
        format!("@{}{}:{}", self.user_prefix, uuid.simple(), self.server_name)
    }

    /// Id of the player a puppet user stands in for: whatever follows the
    /// prefix in the localpart. `None` for the bot, users on other servers,
    /// and anything outside the namespace.
    pub fn player_id(&self, user_id: &str) -> Option<String> {
        let (localpart, server) = user_id.strip_prefix('@')?.split_once(':')?;
        if server != self.server_name || localpart == self.bot_localpart {
            return None;
        }
        let suffix = localpart.strip_prefix(self.user_prefix.as_str())?;
        (!suffix.is_empty()).then(|| suffix.to_string())
    }
}
