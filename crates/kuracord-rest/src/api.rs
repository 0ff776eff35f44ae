//! The REST API seam the gateway depends on

use crate::error::RestError;
use async_trait::async_trait;
use kuracord_core::{Channel, GuildData, Member, Snowflake, User};

/// The endpoint subset the gateway session needs
///
/// The session depends on this trait rather than a concrete HTTP client so
/// tests can substitute canned responses.
#[async_trait]
pub trait Api: Send + Sync {
    /// Fetch the identity behind the configured token
    async fn current_user(&self) -> Result<User, RestError>;

    /// Fetch a guild with its collections
    async fn guild(&self, guild_id: Snowflake) -> Result<GuildData, RestError>;

    /// Fetch a single channel of a guild
    async fn channel(&self, guild_id: Snowflake, channel_id: Snowflake)
        -> Result<Channel, RestError>;

    /// Fetch a single member of a guild
    async fn member(&self, guild_id: Snowflake, member_id: Snowflake)
        -> Result<Member, RestError>;
}
