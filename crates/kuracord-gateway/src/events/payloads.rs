//! Public event payloads

use chrono::{DateTime, Utc};
use kuracord_cache::CachedGuild;
use kuracord_core::{Channel, Guild, Member, Message, Snowflake, User};

/// Socket closed
#[derive(Debug, Clone)]
pub struct SocketCloseEvent {
    /// Close code from the close frame, 1000 when none was sent
    pub code: u16,
    pub reason: String,
}

/// Socket-level error
#[derive(Debug, Clone)]
pub struct SocketErrorEvent {
    pub error: String,
}

/// Handshake finished; the client is ready
#[derive(Debug, Clone)]
pub struct ReadyEvent {
    pub session_id: String,
}

/// A heartbeat was acknowledged
#[derive(Debug, Clone)]
pub struct HeartbeatEvent {
    /// Round-trip time in milliseconds
    pub ping_ms: i64,
    pub timestamp: DateTime<Utc>,
}

/// Too many heartbeats went unacknowledged
#[derive(Debug, Clone)]
pub struct ZombiedEvent {
    /// Unacknowledged heartbeat count at detection time
    pub skipped: u32,
    /// Fatal zombies force a reconnect; non-fatal ones are a warning while
    /// the guild download is still running
    pub fatal: bool,
}

/// A guild became available or was created
#[derive(Debug, Clone)]
pub struct GuildCreateEvent {
    pub guild: CachedGuild,
}

/// A guild's fields changed
#[derive(Debug, Clone)]
pub struct GuildUpdateEvent {
    /// Scalar snapshot captured before the mutation; `None` when the guild
    /// was not cached before this event
    pub before: Option<Guild>,
    pub after: CachedGuild,
}

/// A guild was removed
#[derive(Debug, Clone)]
pub struct GuildDeleteEvent {
    pub guild: CachedGuild,
}

/// The initial guild sync finished
#[derive(Debug, Clone)]
pub struct GuildDownloadCompletedEvent {
    pub guilds: Vec<CachedGuild>,
}

/// A channel was created
#[derive(Debug, Clone)]
pub struct ChannelCreateEvent {
    pub channel: Channel,
}

/// A channel's fields changed
#[derive(Debug, Clone)]
pub struct ChannelUpdateEvent {
    /// `None` when the channel was not cached before this event
    pub before: Option<Channel>,
    pub after: Channel,
    pub guild: Option<CachedGuild>,
}

/// A channel was deleted
#[derive(Debug, Clone)]
pub struct ChannelDeleteEvent {
    pub guild: CachedGuild,
    pub channel: Channel,
}

/// A message was sent
#[derive(Debug, Clone)]
pub struct MessageCreateEvent {
    pub message: Message,
}

/// A message was edited
#[derive(Debug, Clone)]
pub struct MessageUpdateEvent {
    /// The cached copy before the edit; `None` when caching is disabled or
    /// the message was already evicted
    pub before: Option<Message>,
    pub after: Message,
}

/// A message was deleted
///
/// The protocol does not resend the deleted body, so the message is either
/// the cached copy or just its ids.
#[derive(Debug, Clone)]
pub enum DeletedMessage {
    /// The ring buffer still had the message
    Cached(Message),
    /// Only the ids are known
    Unknown {
        id: Snowflake,
        channel_id: Snowflake,
    },
}

impl DeletedMessage {
    /// Id of the deleted message
    #[must_use]
    pub fn id(&self) -> Snowflake {
        match self {
            Self::Cached(message) => message.id,
            Self::Unknown { id, .. } => *id,
        }
    }

    /// Channel the message was deleted from
    #[must_use]
    pub fn channel_id(&self) -> Snowflake {
        match self {
            Self::Cached(message) => message.channel_id(),
            Self::Unknown { channel_id, .. } => *channel_id,
        }
    }
}

/// A message was deleted
#[derive(Debug, Clone)]
pub struct MessageDeleteEvent {
    pub guild: Option<CachedGuild>,
    pub channel: Option<Channel>,
    pub message: DeletedMessage,
}

/// A user joined a guild
#[derive(Debug, Clone)]
pub struct MemberJoinEvent {
    pub member: Member,
    pub guild: CachedGuild,
}

/// A member's fields changed
#[derive(Debug, Clone)]
pub struct MemberUpdateEvent {
    /// The cached entry before the update; equals `after` when the member
    /// was not cached
    pub before: Member,
    pub after: Member,
    pub guild: CachedGuild,
}

/// A member left a guild
#[derive(Debug, Clone)]
pub struct MemberLeaveEvent {
    /// The cached entry, when there was one
    pub member: Option<Member>,
    pub user_id: Snowflake,
    pub member_id: Snowflake,
    pub guild: CachedGuild,
}

/// A user's fields changed
#[derive(Debug, Clone)]
pub struct UserUpdateEvent {
    pub before: User,
    pub after: User,
}

/// A dispatch event this library does not know
#[derive(Debug, Clone)]
pub struct UnknownEvent {
    pub name: String,
    /// Raw JSON body as text
    pub data: String,
}

/// A consumer event handler returned an error
#[derive(Debug, Clone)]
pub struct ClientErrorEvent {
    /// Name of the event whose handler failed
    pub event: String,
    pub error: String,
}
