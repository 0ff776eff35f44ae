//! Dispatch routing
//!
//! Branches on the dispatch event name (decoded once into a closed enum)
//! and hands the payload body to the per-family handlers, which update the
//! entity cache and raise public events. A malformed body drops the event
//! with a warning; the connection stays up.

mod channel;
mod guild;
mod member;
mod message;
mod user;

use crate::client::KuracordClient;
use crate::events::{Event, UnknownEvent};
use crate::protocol::GatewayPayload;
use serde_json::Value;

/// The dispatch events this library understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    GuildCreate,
    GuildUpdate,
    GuildRemove,
    ChannelCreate,
    ChannelUpdate,
    ChannelRemove,
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    MemberJoin,
    MemberUpdate,
    MemberLeave,
    UserUpdate,
    /// Anything else, carrying the raw wire name
    Unknown(String),
}

impl EventKind {
    /// Decode a wire event name, case-insensitively
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "guild_create" => Self::GuildCreate,
            "guild_update" => Self::GuildUpdate,
            "guild_remove" => Self::GuildRemove,
            "channel_create" => Self::ChannelCreate,
            "channel_update" => Self::ChannelUpdate,
            "channel_remove" => Self::ChannelRemove,
            "message_create" => Self::MessageCreate,
            "message_update" => Self::MessageUpdate,
            "message_delete" => Self::MessageDelete,
            "member_join" => Self::MemberJoin,
            "member_update" => Self::MemberUpdate,
            "member_leave" => Self::MemberLeave,
            "user_update" => Self::UserUpdate,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

/// Errors local to one dispatch event; the event is dropped, nothing else
#[derive(Debug, thiserror::Error)]
pub(crate) enum DispatchError {
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("payload is missing the {0} field")]
    MissingField(&'static str),
}

/// Handle one Dispatch payload
pub(crate) async fn handle(client: &KuracordClient, payload: GatewayPayload) {
    let Some(name) = payload.t.clone() else {
        tracing::warn!("Dispatch payload without an event name");
        return;
    };

    let Some(data @ Value::Object(_)) = payload.d else {
        tracing::warn!(
            event = %name,
            "Invalid payload body (this message is probably safe to ignore)"
        );
        return;
    };

    let result = match EventKind::parse(&name) {
        EventKind::GuildCreate => guild::create(client, data).await,
        EventKind::GuildUpdate => guild::update(client, data).await,
        EventKind::GuildRemove => guild::remove(client, data).await,
        EventKind::ChannelCreate => channel::create(client, data).await,
        EventKind::ChannelUpdate => channel::update(client, data).await,
        EventKind::ChannelRemove => channel::remove(client, data).await,
        EventKind::MessageCreate => message::create(client, data).await,
        EventKind::MessageUpdate => message::update(client, data).await,
        EventKind::MessageDelete => message::delete(client, data).await,
        EventKind::MemberJoin => member::join(client, data).await,
        EventKind::MemberUpdate => member::update(client, data).await,
        EventKind::MemberLeave => member::leave(client, data).await,
        EventKind::UserUpdate => user::update(client, data).await,
        EventKind::Unknown(raw) => {
            unknown(client, raw, &data).await;
            Ok(())
        }
    };

    if let Err(error) = result {
        tracing::warn!(event = %name, error = %error, "Dispatch handler failed; event dropped");
    }
}

async fn unknown(client: &KuracordClient, name: String, data: &Value) {
    if client.config().log_unknown_events {
        tracing::warn!(event = %name, "Unknown event");
    }

    client
        .emit(Event::UnknownEvent(UnknownEvent {
            name,
            data: data.to_string(),
        }))
        .await;
}
