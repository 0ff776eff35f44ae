//! message_* dispatch handlers

use super::DispatchError;
use crate::client::KuracordClient;
use crate::events::{
    DeletedMessage, Event, MessageCreateEvent, MessageDeleteEvent, MessageUpdateEvent,
};
use kuracord_cache::CachedGuild;
use kuracord_core::{Message, Snowflake};
use serde::Deserialize;
use serde_json::Value;

/// Point the message's member/channel foreign keys at its guild and author,
/// then sync the author into the user cache and (when the guild is cached)
/// the member collection and channel list
fn ingest(client: &KuracordClient, message: &mut Message) {
    let guild_id = message.guild.id;

    message.channel.guild_id = Some(guild_id);
    if let Some(member) = &mut message.member {
        member.user = message.author.clone();
        member.guild_id = guild_id;
        member.guild = None;
    }

    client.cache().upsert_user(message.author.clone());

    if client.cache().contains_guild(guild_id) {
        // a message can reference a channel the cache has not seen yet
        client.cache().add_channel(guild_id, message.channel.clone());
        if let Some(member) = &message.member {
            client.cache().add_member(guild_id, member.clone());
        }
    } else {
        tracing::warn!(
            guild_id = %guild_id,
            "Channel which the last message belongs to is not in cache - cache state might be invalid!"
        );
    }
}

/// message_create: ingest, remember in the ring buffer, announce
pub(super) async fn create(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let mut message: Message = serde_json::from_value(data)?;
    ingest(client, &mut message);

    client.cache().messages().insert(message.clone());

    client
        .emit(Event::MessageCreated(MessageCreateEvent { message }))
        .await;
    Ok(())
}

/// message_update: recover the previous copy from the ring buffer when
/// possible; otherwise the incoming payload stands in for both states
pub(super) async fn update(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let mut message: Message = serde_json::from_value(data)?;
    ingest(client, &mut message);

    let (before, after) = match client.cache().messages().apply_edit(&message) {
        Some((before, after)) => (Some(before), after),
        None => (None, message),
    };

    client
        .emit(Event::MessageUpdated(MessageUpdateEvent { before, after }))
        .await;
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDeleteData {
    message_id: Snowflake,
    channel_id: Snowflake,
    #[serde(default)]
    guild_id: Option<Snowflake>,
}

/// message_delete: the body is not resent, so enrich from the caches and
/// fall back to bare ids
pub(super) async fn delete(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let body: MessageDeleteData = serde_json::from_value(data)?;

    let guild: Option<CachedGuild> = match body.guild_id {
        Some(guild_id) => match client.cache().guild(guild_id) {
            Some(guild) => Some(guild),
            None => match client.inner.api.guild(guild_id).await {
                Ok(data) => Some(CachedGuild::from_data(data)),
                Err(error) => {
                    tracing::warn!(guild_id = %guild_id, error = %error, "Failed to resolve guild for deleted message");
                    None
                }
            },
        },
        None => None,
    };

    let channel = match client.cache().find_channel(body.channel_id) {
        Some(channel) => Some(channel),
        None => match body.guild_id {
            Some(guild_id) => match client.inner.api.channel(guild_id, body.channel_id).await {
                Ok(channel) => Some(channel),
                Err(error) => {
                    tracing::warn!(channel_id = %body.channel_id, error = %error, "Failed to resolve channel for deleted message");
                    None
                }
            },
            None => None,
        },
    };

    let message = client
        .cache()
        .messages()
        .remove(body.message_id, body.channel_id)
        .map_or(
            DeletedMessage::Unknown {
                id: body.message_id,
                channel_id: body.channel_id,
            },
            DeletedMessage::Cached,
        );

    client
        .emit(Event::MessageDeleted(MessageDeleteEvent {
            guild,
            channel,
            message,
        }))
        .await;
    Ok(())
}
