//! Role entity

use crate::value_objects::{Permissions, Snowflake};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A guild role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Snowflake,

    #[serde(default)]
    pub name: String,

    /// Packed RGB color value
    #[serde(default)]
    pub color: u32,

    /// Whether members with this role are listed separately
    #[serde(default)]
    pub hoist: bool,

    #[serde(default)]
    pub permissions: Permissions,

    /// Foreign key to the owning guild; filled by the cache layer
    #[serde(skip)]
    pub guild_id: Snowflake,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Role {}; {}", self.id, self.name)
    }
}
