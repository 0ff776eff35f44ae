//! API route builders

use kuracord_core::Snowflake;

pub const GUILDS: &str = "/guilds";
pub const USERS: &str = "/users";
pub const MEMBERS: &str = "/members";
pub const CHANNELS: &str = "/channels";

/// `GET /users/@me`
#[must_use]
pub fn current_user(base: &str) -> String {
    format!("{base}{USERS}/@me")
}

/// `GET /guilds/{guild_id}`
#[must_use]
pub fn guild(base: &str, guild_id: Snowflake) -> String {
    format!("{base}{GUILDS}/{guild_id}")
}

/// `GET /guilds/{guild_id}/channels`
#[must_use]
pub fn guild_channels(base: &str, guild_id: Snowflake) -> String {
    format!("{base}{GUILDS}/{guild_id}{CHANNELS}")
}

/// `GET /guilds/{guild_id}/members/{member_id}`
#[must_use]
pub fn guild_member(base: &str, guild_id: Snowflake, member_id: Snowflake) -> String {
    format!("{base}{GUILDS}/{guild_id}{MEMBERS}/{member_id}")
}
