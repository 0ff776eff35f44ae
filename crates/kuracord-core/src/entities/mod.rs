//! Entities
//!
//! Plain-data representations of Kuracord API objects. Relationships are
//! expressed as foreign keys (`guild_id`) filled in by the cache layer,
//! never as object back-references, so entities can be cloned and shared
//! across threads freely.

mod channel;
mod guild;
mod member;
mod message;
mod role;
mod user;

pub use channel::{Channel, ChannelType};
pub use guild::{Guild, GuildData};
pub use member::Member;
pub use message::{Attachment, Message};
pub use role::Role;
pub use user::{Membership, PremiumType, User};

/// Base CDN URL for avatars and icons
pub const CDN_URL: &str = "https://cdn.kuracord.tk";
