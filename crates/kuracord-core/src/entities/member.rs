//! Member entity

use crate::entities::{Guild, User};
use crate::value_objects::Snowflake;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A guild member
///
/// A member is uniquely identified by the (user id, guild id) pair: the
/// same user appears as a distinct member in every guild they belong to.
/// Equality follows that identity, not field-by-field comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,

    pub user: User,

    /// Nested guild scalars, present on member dispatch payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild: Option<Guild>,

    /// Foreign key to the owning guild; filled by the cache layer
    #[serde(skip)]
    pub guild_id: Snowflake,
}

impl Member {
    /// The id of the user behind this member
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> Snowflake {
        self.user.id
    }

    /// Nickname if set, username otherwise
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.user.username)
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.user.id == other.user.id && self.guild_id == other.guild_id
    }
}

impl Eq for Member {}
