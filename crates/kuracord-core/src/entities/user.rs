//! User entity

use crate::entities::{Member, CDN_URL};
use crate::value_objects::{Snowflake, UserFlags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A Kuracord user account
///
/// Users are stored once per id in the global user cache; members hold a
/// copy that the cache keeps in sync on `user_update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Snowflake,

    #[serde(default)]
    pub username: String,

    /// 4-digit discriminator distinguishing same-named users
    #[serde(default)]
    pub discriminator: String,

    #[serde(rename = "bio", default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,

    /// Avatar hash; `None` means the default avatar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default)]
    pub bot: bool,

    #[serde(default)]
    pub disabled: bool,

    /// Only present in OAuth contexts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,

    /// Only present in OAuth contexts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_type: Option<PremiumType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<UserFlags>,

    /// Guild memberships, present on the READY payload's current user
    #[serde(rename = "guilds", default, skip_serializing_if = "Option::is_none")]
    pub guild_memberships: Option<Vec<Membership>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Get the full tag: username#discriminator
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    /// Get the user's avatar URL, if an avatar is set
    #[must_use]
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .map(|hash| format!("{CDN_URL}/avatars/{}/{hash}", self.id))
    }
}

/// A guild membership entry on the current user's READY payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,

    pub guild: crate::entities::Guild,
}

// READY memberships reuse the member wire shape minus the user object, so a
// full Member converts down losslessly for tests and callers that have one.
impl From<Member> for Membership {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            nickname: member.nickname,
            joined_at: member.joined_at,
            guild: member.guild.unwrap_or_else(|| crate::entities::Guild::empty(member.guild_id)),
        }
    }
}

/// The type of premium subscription on a user's account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PremiumType {
    None = 0,
    NitroClassic = 1,
    Nitro = 2,
}

impl PremiumType {
    /// Create a `PremiumType` from a raw integer value
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::NitroClassic),
            2 => Some(Self::Nitro),
            _ => None,
        }
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Serialize for PremiumType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for PremiumType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid premium type: {value}")))
    }
}
