//! Guild entity

use crate::entities::{Channel, Member, Role, User, CDN_URL};
use crate::value_objects::Snowflake;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A guild (server): the scalar fields only
///
/// The channel/role/member collections ride alongside in [`GuildData`] on
/// the wire and live in the cache's per-guild maps once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guild {
    pub id: Snowflake,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub short_name: String,

    /// Vanity invite code
    #[serde(rename = "vanityUrl", default, skip_serializing_if = "Option::is_none")]
    pub vanity_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Icon hash; `None` means no icon
    #[serde(rename = "icon", default, skip_serializing_if = "Option::is_none")]
    pub icon_hash: Option<String>,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Guild {
    /// A placeholder guild carrying only an id, for payloads that reference
    /// a guild without embedding one
    #[must_use]
    pub fn empty(id: Snowflake) -> Self {
        Self {
            id,
            name: String::new(),
            short_name: String::new(),
            vanity_code: None,
            description: None,
            icon_hash: None,
            disabled: false,
            owner: None,
            created_at: None,
        }
    }

    /// Get the id of the guild's owner, if the owner is known
    #[must_use]
    pub fn owner_id(&self) -> Option<Snowflake> {
        self.owner.as_ref().map(|owner| owner.id)
    }

    /// Get the guild's icon URL, if an icon is set
    #[must_use]
    pub fn icon_url(&self) -> Option<String> {
        self.icon_hash
            .as_ref()
            .map(|hash| format!("{CDN_URL}/icons/{}/{hash}", self.id))
    }
}

/// A guild together with its collections, as REST `GET /guilds/{id}` and
/// the guild_create/guild_update dispatch payloads deliver it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildData {
    #[serde(flatten)]
    pub guild: Guild,

    #[serde(default)]
    pub channels: Vec<Channel>,

    #[serde(default)]
    pub roles: Vec<Role>,

    /// An accompanying member list is an authoritative snapshot; its absence
    /// means "no member information", not "no members"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Member>>,
}

impl GuildData {
    /// Wrap bare guild scalars with empty collections
    #[must_use]
    pub fn from_guild(guild: Guild) -> Self {
        Self {
            guild,
            channels: Vec::new(),
            roles: Vec::new(),
            members: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> Snowflake {
        self.guild.id
    }
}
