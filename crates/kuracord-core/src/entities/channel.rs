//! Channel entity

use crate::value_objects::Snowflake;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A guild channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: Snowflake,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub channel_type: ChannelType,

    /// Foreign key to the owning guild; filled by the cache layer, the wire
    /// carries a nested guild object instead
    #[serde(skip)]
    pub guild_id: Option<Snowflake>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel {}; {}", self.id, self.name)
    }
}

/// The type of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelType {
    /// A text channel
    #[default]
    Text,
    /// A type this library does not know about
    Unknown,
}

impl ChannelType {
    /// Create a `ChannelType` from the raw wire value
    #[must_use]
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// Get the raw wire value
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::Text => 0,
            Self::Unknown => u32::MAX,
        }
    }
}

impl Serialize for ChannelType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.as_u32())
    }
}

impl<'de> Deserialize<'de> for ChannelType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        Ok(Self::from_u32(value))
    }
}
