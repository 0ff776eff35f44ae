//! Wire fixtures for the mock gateway

use kuracord_core::{GuildData, User};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

/// A minimal user entity
#[must_use]
pub fn user(id: u64) -> User {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "username": format!("user-{id}"),
        "discriminator": "0001"
    }))
    .unwrap()
}

/// A guild payload with one channel and one member, as REST would serve it
#[must_use]
pub fn guild_data(id: u64) -> GuildData {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": "Velvet Room",
        "shortName": "velvet",
        "channels": [{ "id": 42, "name": "general", "type": 0 }],
        "roles": [],
        "members": [
            { "id": 100, "user": { "id": 100, "username": "igor" } }
        ]
    }))
    .unwrap()
}

/// HELLO frame (op 4)
#[must_use]
pub fn hello_frame(heartbeat_interval_ms: u64) -> Message {
    Message::Text(
        serde_json::json!({ "op": 4, "d": { "heartbeat": heartbeat_interval_ms } }).to_string(),
    )
}

/// READY frame (op 3) for `user_id` with memberships in `guild_ids`
#[must_use]
pub fn ready_frame(session_id: &str, user_id: u64, guild_ids: &[u64]) -> Message {
    let memberships: Vec<serde_json::Value> = guild_ids
        .iter()
        .map(|guild_id| {
            serde_json::json!({
                "id": user_id,
                "guild": { "id": guild_id, "name": "Velvet Room", "shortName": "velvet" }
            })
        })
        .collect();

    Message::Text(
        serde_json::json!({
            "op": 3,
            "d": {
                "sessionId": session_id,
                "user": {
                    "id": user_id,
                    "username": format!("user-{user_id}"),
                    "discriminator": "0001",
                    "guilds": memberships
                }
            }
        })
        .to_string(),
    )
}

/// A dispatch frame (op 1)
#[must_use]
pub fn dispatch_frame(event: &str, sequence: u64, data: serde_json::Value) -> Message {
    Message::Text(
        serde_json::json!({ "op": 1, "t": event, "s": sequence, "d": data }).to_string(),
    )
}

/// A close frame with the given code
#[must_use]
pub fn close_frame(code: u16, reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code: code.into(),
        reason: reason.into(),
    }))
}

/// The op code of a received client frame, if it is textual JSON
#[must_use]
pub fn frame_op(message: &Message) -> Option<u64> {
    match message {
        Message::Text(text) => serde_json::from_str::<serde_json::Value>(text)
            .ok()?
            .get("op")?
            .as_u64(),
        _ => None,
    }
}
