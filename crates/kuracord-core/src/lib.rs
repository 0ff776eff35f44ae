//! # kuracord-core
//!
//! Object model for the Kuracord API: entities and value objects shared by
//! the cache, REST, and gateway crates. This crate has zero dependencies on
//! networking or runtime infrastructure.

pub mod entities;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Attachment, Channel, ChannelType, Guild, GuildData, Member, Membership, Message, PremiumType,
    Role, User,
};
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError, UserFlags};
