//! Message entity

use crate::entities::{Channel, Guild, Member, User};
use crate::value_objects::Snowflake;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text message
///
/// Message payloads embed the guild and channel they were sent in, plus the
/// author both as a user and (when sent from a guild) as a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Snowflake,

    #[serde(default)]
    pub content: String,

    /// Set only when the message was edited
    #[serde(rename = "editedAt", default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    pub author: User,

    pub guild: Guild,

    pub channel: Channel,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    #[inline]
    #[must_use]
    pub fn channel_id(&self) -> Snowflake {
        self.channel.id
    }

    #[inline]
    #[must_use]
    pub fn guild_id(&self) -> Snowflake {
        self.guild.id
    }

    /// Whether this message was edited after being sent
    #[inline]
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }
}

/// A file attached to a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Snowflake,

    #[serde(default)]
    pub file_name: String,

    #[serde(default)]
    pub url: String,

    /// Size in bytes, when the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}
