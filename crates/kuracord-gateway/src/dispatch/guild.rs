//! guild_* dispatch handlers

use super::DispatchError;
use crate::client::KuracordClient;
use crate::events::{Event, GuildCreateEvent, GuildDeleteEvent, GuildDownloadCompletedEvent, GuildUpdateEvent};
use kuracord_core::{GuildData, Snowflake};
use serde::Deserialize;
use serde_json::Value;

/// guild_create: merge into the cache; "available" when the guild was
/// already known (a resumed session re-announcing it), "created" otherwise
pub(super) async fn create(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let guild: GuildData = serde_json::from_value(data)?;
    let upsert = client.cache().upsert_guild(guild);

    let was_completed = client.session_state().mark_guild_download_completed();

    let event = GuildCreateEvent { guild: upsert.after };
    if upsert.existed {
        client.emit(Event::GuildAvailable(event)).await;
    } else {
        client.emit(Event::GuildCreated(event)).await;
    }

    if !was_completed {
        client
            .emit(Event::GuildDownloadCompleted(GuildDownloadCompletedEvent {
                guilds: client.cache().guilds_snapshot(),
            }))
            .await;
    }

    Ok(())
}

/// guild_update: snapshot the scalars, merge, raise before/after
pub(super) async fn update(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let guild: GuildData = serde_json::from_value(data)?;
    let upsert = client.cache().upsert_guild(guild);

    client
        .emit(Event::GuildUpdated(GuildUpdateEvent {
            before: upsert.before,
            after: upsert.after,
        }))
        .await;

    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuildRemoveData {
    guild_id: Snowflake,
}

/// guild_remove: drop from the cache; a miss is a silent no-op
pub(super) async fn remove(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let body: GuildRemoveData = serde_json::from_value(data)?;

    let Some(guild) = client.cache().remove_guild(body.guild_id) else {
        return Ok(());
    };

    client.emit(Event::GuildDeleted(GuildDeleteEvent { guild })).await;
    Ok(())
}
