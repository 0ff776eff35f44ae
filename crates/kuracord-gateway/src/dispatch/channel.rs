//! channel_* dispatch handlers

use super::DispatchError;
use crate::client::KuracordClient;
use crate::events::{ChannelCreateEvent, ChannelDeleteEvent, ChannelUpdateEvent, Event};
use kuracord_core::{Channel, Guild, Snowflake};
use serde::Deserialize;
use serde_json::Value;

/// A channel payload with its nested guild
#[derive(Deserialize)]
struct ChannelData {
    #[serde(flatten)]
    channel: Channel,
    #[serde(default)]
    guild: Option<Guild>,
}

impl ChannelData {
    fn guild_id(&self) -> Result<Snowflake, DispatchError> {
        self.guild
            .as_ref()
            .map(|guild| guild.id)
            .or(self.channel.guild_id)
            .ok_or(DispatchError::MissingField("guild"))
    }
}

/// channel_create: attach the guild key, append unless the id is taken
pub(super) async fn create(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let body: ChannelData = serde_json::from_value(data)?;
    let guild_id = body.guild_id()?;

    let Some(channel) = client.cache().add_channel(guild_id, body.channel) else {
        tracing::error!(guild_id = %guild_id, "Could not find {guild_id} in guild cache");
        return Ok(());
    };

    client
        .emit(Event::ChannelCreated(ChannelCreateEvent { channel }))
        .await;
    Ok(())
}

/// channel_update: mutate in place when cached, replace by id otherwise
pub(super) async fn update(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let body: ChannelData = serde_json::from_value(data)?;
    let guild_hint = body.guild.as_ref().map(|guild| guild.id);

    let update = client.cache().update_channel(guild_hint, &body.channel);
    let guild = update.guild_id.and_then(|id| client.cache().guild(id));

    client
        .emit(Event::ChannelUpdated(ChannelUpdateEvent {
            before: update.before,
            after: update.after,
            guild,
        }))
        .await;
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelRemoveData {
    guild_id: Snowflake,
    channel_id: Snowflake,
}

/// channel_remove: locate and drop; a miss is a silent no-op
pub(super) async fn remove(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let body: ChannelRemoveData = serde_json::from_value(data)?;

    let Some(channel) = client.cache().remove_channel(body.guild_id, body.channel_id) else {
        return Ok(());
    };
    let Some(guild) = client.cache().guild(body.guild_id) else {
        return Ok(());
    };

    client
        .emit(Event::ChannelDeleted(ChannelDeleteEvent { guild, channel }))
        .await;
    Ok(())
}
