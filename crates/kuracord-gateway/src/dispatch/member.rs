//! member_* dispatch handlers
//!
//! Member events resolve their guild strictly from the cache: a miss here
//! is a startup race that the next full resync heals, so the event is
//! logged at error severity and dropped rather than retried.

use super::DispatchError;
use crate::client::KuracordClient;
use crate::events::{Event, MemberJoinEvent, MemberLeaveEvent, MemberUpdateEvent};
use kuracord_cache::CachedGuild;
use kuracord_core::{Member, Snowflake};
use serde::Deserialize;
use serde_json::Value;

fn cached_guild_or_drop(client: &KuracordClient, guild_id: Snowflake) -> Option<CachedGuild> {
    let guild = client.cache().guild(guild_id);
    if guild.is_none() {
        tracing::error!(guild_id = %guild_id, "Could not find {guild_id} in guild cache");
    }
    guild
}

fn member_guild_id(member: &Member) -> Result<Snowflake, DispatchError> {
    member
        .guild
        .as_ref()
        .map(|guild| guild.id)
        .ok_or(DispatchError::MissingField("guild"))
}

/// member_join: de-duplicated insert plus a user-cache refresh
pub(super) async fn join(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let mut member: Member = serde_json::from_value(data)?;
    let guild_id = member_guild_id(&member)?;

    if cached_guild_or_drop(client, guild_id).is_none() {
        return Ok(());
    }

    member.guild_id = guild_id;
    member.guild = None;

    client.cache().upsert_user(member.user.clone());
    client.cache().add_member(guild_id, member.clone());

    let Some(guild) = client.cache().guild(guild_id) else {
        return Ok(());
    };

    client
        .emit(Event::MemberJoined(MemberJoinEvent { member, guild }))
        .await;
    Ok(())
}

/// member_update: members are replaced, not mutated in place; the prior
/// entity (matched by user and guild) becomes the "before" half
pub(super) async fn update(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let mut member: Member = serde_json::from_value(data)?;
    let guild_id = member_guild_id(&member)?;

    if cached_guild_or_drop(client, guild_id).is_none() {
        return Ok(());
    }

    member.guild_id = guild_id;
    member.guild = None;

    client.cache().upsert_user(member.user.clone());

    let before = client
        .cache()
        .replace_member(guild_id, member.clone())
        .flatten()
        .unwrap_or_else(|| member.clone());

    let Some(guild) = client.cache().guild(guild_id) else {
        return Ok(());
    };

    client
        .emit(Event::MemberUpdated(MemberUpdateEvent {
            before,
            after: member,
            guild,
        }))
        .await;
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberLeaveData {
    user_id: Snowflake,
    member_id: Snowflake,
    guild_id: Snowflake,
}

/// member_leave: remove by identity; an unknown member still raises the
/// event with the payload's ids
pub(super) async fn leave(client: &KuracordClient, data: Value) -> Result<(), DispatchError> {
    let body: MemberLeaveData = serde_json::from_value(data)?;

    if !client.cache().contains_guild(body.guild_id) {
        // our own departure from an uncached guild is expected
        if client.current_user_id() != Some(body.user_id) {
            tracing::error!(
                guild_id = %body.guild_id,
                "Could not find {} in guild cache",
                body.guild_id
            );
        }
        return Ok(());
    }

    let removed = client
        .cache()
        .remove_member(body.guild_id, body.user_id)
        .flatten();

    if let Some(member) = &removed {
        client.cache().upsert_user(member.user.clone());
    }

    let Some(guild) = client.cache().guild(body.guild_id) else {
        return Ok(());
    };

    client
        .emit(Event::MemberLeft(MemberLeaveEvent {
            member: removed,
            user_id: body.user_id,
            member_id: body.member_id,
            guild,
        }))
        .await;
    Ok(())
}
