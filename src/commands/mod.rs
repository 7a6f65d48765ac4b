//! # Command System
//!
//! Slash command listeners and the table that routes Slack's `command` field to them.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: `/play` search link

pub mod play;

/// Slash commands this app answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
}

impl Command {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            play::NAME => Some(Command::Play),
            _ => None,
        }
    }
}
