//! Slack wire types for slash commands.

use serde::{Deserialize, Serialize};

/// Form fields Slack posts when a user invokes a slash command.
///
/// Only `command`, `text` and `response_url` drive behaviour; the rest is carried
/// along for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SlashCommand {
    pub token: String,
    pub team_id: String,
    pub team_domain: String,
    pub enterprise_id: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub api_app_id: String,
    pub response_url: String,
    pub trigger_id: String,
}

impl SlashCommand {
    /// Parse an `application/x-www-form-urlencoded` request body.
    pub fn from_form(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_bytes(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Posted publicly in the channel the command came from.
    InChannel,
}

/// Message body sent back through a command's `response_url`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlackMessage {
    pub response_type: ResponseType,
    pub text: String,
}

impl SlackMessage {
    pub fn in_channel(text: impl Into<String>) -> Self {
        SlackMessage {
            response_type: ResponseType::InChannel,
            text: text.into(),
        }
    }
}
