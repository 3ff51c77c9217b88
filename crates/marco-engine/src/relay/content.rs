use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// The only `format` whose `formatted_body` is read as markup.
pub const HTML_FORMAT: &str = "org.matrix.custom.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "m.text")]
    Text,
    #[serde(rename = "m.emote")]
    Emote,
    #[serde(rename = "m.notice")]
    Notice,
    #[serde(untagged)]
    Other(String),
}

/// Content of an `m.room.message` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub msgtype: MessageType,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_body: Option<String>,
}

impl MessageContent {
    /// Content with `markup` as an HTML formatted body, when given.
    pub fn new(msgtype: MessageType, body: impl Into<String>, markup: Option<String>) -> Self {
        Self {
            msgtype,
            body: body.into(),
            format: markup.as_ref().map(|_| HTML_FORMAT.to_string()),
            formatted_body: markup,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The formatted body, if it is chat markup.
    pub fn markup(&self) -> Option<&str> {
        match self.format.as_deref() {
            Some(HTML_FORMAT) => self.formatted_body.as_deref(),
            _ => None,
        }
    }
}
