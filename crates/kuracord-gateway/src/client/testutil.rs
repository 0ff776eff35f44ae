//! Shared helpers for in-crate tests

use crate::client::KuracordClient;
use crate::events::{
    ChannelCreateEvent, ChannelDeleteEvent, ChannelUpdateEvent, ClientErrorEvent, DeletedMessage,
    EventHandler, GuildCreateEvent, GuildDeleteEvent, GuildDownloadCompletedEvent,
    GuildUpdateEvent, HeartbeatEvent, MemberJoinEvent, MemberLeaveEvent, MemberUpdateEvent,
    MessageCreateEvent, MessageDeleteEvent, MessageUpdateEvent, ReadyEvent, SocketCloseEvent,
    SocketErrorEvent, UnknownEvent, UserUpdateEvent, ZombiedEvent,
};
use crate::protocol::{GatewayOpCode, GatewayPayload};
use async_trait::async_trait;
use kuracord_common::ClientConfig;
use kuracord_core::{Channel, GuildData, Member, Snowflake, User};
use kuracord_rest::{Api, RestError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Canned REST responses for tests
#[derive(Default)]
pub(crate) struct MockApi {
    pub user: Mutex<Option<User>>,
    pub guilds: Mutex<HashMap<Snowflake, GuildData>>,
}

#[async_trait]
impl Api for MockApi {
    async fn current_user(&self) -> Result<User, RestError> {
        self.user
            .lock()
            .clone()
            .ok_or_else(|| RestError::from_status(401, "no identity configured".to_string()))
    }

    async fn guild(&self, guild_id: Snowflake) -> Result<GuildData, RestError> {
        self.guilds
            .lock()
            .get(&guild_id)
            .cloned()
            .ok_or_else(|| RestError::NotFound(format!("guild {guild_id}")))
    }

    async fn channel(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> Result<Channel, RestError> {
        let guilds = self.guilds.lock();
        guilds
            .get(&guild_id)
            .and_then(|data| data.channels.iter().find(|c| c.id == channel_id))
            .cloned()
            .ok_or_else(|| RestError::NotFound(format!("channel {channel_id}")))
    }

    async fn member(&self, guild_id: Snowflake, member_id: Snowflake) -> Result<Member, RestError> {
        let guilds = self.guilds.lock();
        guilds
            .get(&guild_id)
            .and_then(|data| data.members.as_ref())
            .and_then(|members| members.iter().find(|m| m.user_id() == member_id))
            .cloned()
            .ok_or_else(|| RestError::NotFound(format!("member {member_id}")))
    }
}

/// Records every event it sees
#[derive(Default)]
pub(crate) struct RecordingHandler {
    names: Mutex<Vec<String>>,
    guild_update_befores: Mutex<Vec<Option<String>>>,
    message_update_befores: Mutex<Vec<Option<String>>>,
    deleted_messages: Mutex<Vec<DeletedMessage>>,
    member_left_events: Mutex<Vec<MemberLeaveEvent>>,
    channel_update_events: Mutex<Vec<ChannelUpdateEvent>>,
}

impl RecordingHandler {
    fn record(&self, name: &str) {
        self.names.lock().push(name.to_string());
    }

    pub fn names(&self) -> Vec<String> {
        self.names.lock().clone()
    }

    pub fn guild_update_befores(&self) -> Vec<Option<String>> {
        self.guild_update_befores.lock().clone()
    }

    pub fn message_update_befores(&self) -> Vec<Option<String>> {
        self.message_update_befores.lock().clone()
    }

    pub fn deleted_messages(&self) -> Vec<DeletedMessage> {
        self.deleted_messages.lock().clone()
    }

    pub fn member_left(&self) -> Vec<MemberLeaveEvent> {
        self.member_left_events.lock().clone()
    }

    pub fn channel_updates(&self) -> Vec<ChannelUpdateEvent> {
        self.channel_update_events.lock().clone()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn socket_opened(&self, _client: &KuracordClient) -> anyhow::Result<()> {
        self.record("socket_opened");
        Ok(())
    }

    async fn socket_closed(
        &self,
        _client: &KuracordClient,
        _event: &SocketCloseEvent,
    ) -> anyhow::Result<()> {
        self.record("socket_closed");
        Ok(())
    }

    async fn socket_errored(
        &self,
        _client: &KuracordClient,
        _event: &SocketErrorEvent,
    ) -> anyhow::Result<()> {
        self.record("socket_errored");
        Ok(())
    }

    async fn ready(&self, _client: &KuracordClient, _event: &ReadyEvent) -> anyhow::Result<()> {
        self.record("ready");
        Ok(())
    }

    async fn heartbeated(
        &self,
        _client: &KuracordClient,
        _event: &HeartbeatEvent,
    ) -> anyhow::Result<()> {
        self.record("heartbeated");
        Ok(())
    }

    async fn zombied(&self, _client: &KuracordClient, event: &ZombiedEvent) -> anyhow::Result<()> {
        self.record(if event.fatal { "zombied(fatal)" } else { "zombied(warning)" });
        Ok(())
    }

    async fn guild_created(
        &self,
        _client: &KuracordClient,
        _event: &GuildCreateEvent,
    ) -> anyhow::Result<()> {
        self.record("guild_created");
        Ok(())
    }

    async fn guild_available(
        &self,
        _client: &KuracordClient,
        _event: &GuildCreateEvent,
    ) -> anyhow::Result<()> {
        self.record("guild_available");
        Ok(())
    }

    async fn guild_updated(
        &self,
        _client: &KuracordClient,
        event: &GuildUpdateEvent,
    ) -> anyhow::Result<()> {
        self.record("guild_updated");
        self.guild_update_befores
            .lock()
            .push(event.before.as_ref().map(|guild| guild.name.clone()));
        Ok(())
    }

    async fn guild_deleted(
        &self,
        _client: &KuracordClient,
        _event: &GuildDeleteEvent,
    ) -> anyhow::Result<()> {
        self.record("guild_deleted");
        Ok(())
    }

    async fn guild_download_completed(
        &self,
        _client: &KuracordClient,
        _event: &GuildDownloadCompletedEvent,
    ) -> anyhow::Result<()> {
        self.record("guild_download_completed");
        Ok(())
    }

    async fn channel_created(
        &self,
        _client: &KuracordClient,
        _event: &ChannelCreateEvent,
    ) -> anyhow::Result<()> {
        self.record("channel_created");
        Ok(())
    }

    async fn channel_updated(
        &self,
        _client: &KuracordClient,
        event: &ChannelUpdateEvent,
    ) -> anyhow::Result<()> {
        self.record("channel_updated");
        self.channel_update_events.lock().push(event.clone());
        Ok(())
    }

    async fn channel_deleted(
        &self,
        _client: &KuracordClient,
        _event: &ChannelDeleteEvent,
    ) -> anyhow::Result<()> {
        self.record("channel_deleted");
        Ok(())
    }

    async fn message_created(
        &self,
        _client: &KuracordClient,
        _event: &MessageCreateEvent,
    ) -> anyhow::Result<()> {
        self.record("message_created");
        Ok(())
    }

    async fn message_updated(
        &self,
        _client: &KuracordClient,
        event: &MessageUpdateEvent,
    ) -> anyhow::Result<()> {
        self.record("message_updated");
        self.message_update_befores
            .lock()
            .push(event.before.as_ref().map(|message| message.content.clone()));
        Ok(())
    }

    async fn message_deleted(
        &self,
        _client: &KuracordClient,
        event: &MessageDeleteEvent,
    ) -> anyhow::Result<()> {
        self.record("message_deleted");
        self.deleted_messages.lock().push(event.message.clone());
        Ok(())
    }

    async fn member_joined(
        &self,
        _client: &KuracordClient,
        _event: &MemberJoinEvent,
    ) -> anyhow::Result<()> {
        self.record("member_joined");
        Ok(())
    }

    async fn member_updated(
        &self,
        _client: &KuracordClient,
        _event: &MemberUpdateEvent,
    ) -> anyhow::Result<()> {
        self.record("member_updated");
        Ok(())
    }

    async fn member_left(
        &self,
        _client: &KuracordClient,
        event: &MemberLeaveEvent,
    ) -> anyhow::Result<()> {
        self.record("member_left");
        self.member_left_events.lock().push(event.clone());
        Ok(())
    }

    async fn user_updated(
        &self,
        _client: &KuracordClient,
        _event: &UserUpdateEvent,
    ) -> anyhow::Result<()> {
        self.record("user_updated");
        Ok(())
    }

    async fn unknown_event(
        &self,
        _client: &KuracordClient,
        _event: &UnknownEvent,
    ) -> anyhow::Result<()> {
        self.record("unknown_event");
        Ok(())
    }

    async fn client_errored(
        &self,
        _client: &KuracordClient,
        _event: &ClientErrorEvent,
    ) -> anyhow::Result<()> {
        self.record("client_errored");
        Ok(())
    }
}

/// A client wired to a mock REST collaborator
pub(crate) fn test_client() -> KuracordClient {
    let config = ClientConfig::new("test-token")
        .unwrap()
        .with_gateway_url("ws://127.0.0.1:1")
        .with_message_cache_size(16);

    KuracordClient::with_api(config, Arc::new(MockApi::default()))
}

/// A test client plus a registered recording handler
pub(crate) fn recording_client() -> (KuracordClient, Arc<RecordingHandler>) {
    let client = test_client();
    let handler = Arc::new(RecordingHandler::default());
    client.register_handler(handler.clone());
    (client, handler)
}

/// Event names the handler saw, in order
pub(crate) fn recorded_names(handler: &Arc<RecordingHandler>) -> Vec<String> {
    handler.names()
}

/// Feed one dispatch payload through the router
pub(crate) async fn dispatch(client: &KuracordClient, event: &str, data: serde_json::Value) {
    let payload = GatewayPayload {
        op: GatewayOpCode::Dispatch,
        d: Some(data),
        s: None,
        t: Some(event.to_string()),
    };
    crate::dispatch::handle(client, payload).await;
}

/// A guild payload with one channel and one member
pub(crate) fn guild_json(id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": "Velvet Room",
        "shortName": "velvet",
        "channels": [{ "id": 42, "name": "general", "type": 0 }],
        "roles": [],
        "members": [
            { "id": 100, "user": { "id": 100, "username": "igor" } }
        ]
    })
}

/// A member payload with its nested guild
pub(crate) fn member_json(user_id: u64, guild_id: u64, username: &str) -> serde_json::Value {
    serde_json::json!({
        "id": user_id,
        "user": { "id": user_id, "username": username },
        "guild": { "id": guild_id, "name": "Velvet Room", "shortName": "velvet" }
    })
}

/// A message payload authored by user 100
pub(crate) fn message_json(
    id: u64,
    channel_id: u64,
    guild_id: u64,
    content: &str,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "content": content,
        "author": { "id": 100, "username": "igor" },
        "guild": { "id": guild_id, "name": "Velvet Room", "shortName": "velvet" },
        "channel": { "id": channel_id, "name": "general", "type": 0 },
        "member": { "id": 100, "user": { "id": 100, "username": "igor" } }
    })
}
