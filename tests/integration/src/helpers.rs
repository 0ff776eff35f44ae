//! Test harness: mock gateway socket, canned REST API, event probe

use async_trait::async_trait;
use kuracord_core::{Channel, GuildData, Member, Snowflake, User};
use kuracord_gateway::events::{
    ChannelCreateEvent, ChannelDeleteEvent, ChannelUpdateEvent, ClientErrorEvent,
    GuildCreateEvent, GuildDeleteEvent, GuildDownloadCompletedEvent, GuildUpdateEvent,
    HeartbeatEvent, MemberJoinEvent, MemberLeaveEvent, MemberUpdateEvent, MessageCreateEvent,
    MessageDeleteEvent, MessageUpdateEvent, ReadyEvent, SocketCloseEvent, SocketErrorEvent,
    UnknownEvent, UserUpdateEvent, ZombiedEvent,
};
use kuracord_gateway::{EventHandler, KuracordClient};
use kuracord_rest::{Api, RestError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Bind a listener for a mock gateway and return it with its ws:// URL
pub async fn bind_gateway() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    (listener, url)
}

/// REST collaborator with canned responses
#[derive(Default)]
pub struct CannedApi {
    pub user: Option<User>,
    pub guilds: HashMap<Snowflake, GuildData>,
}

impl CannedApi {
    /// An API whose identity is the given user id
    #[must_use]
    pub fn with_user(user_id: u64) -> Self {
        Self {
            user: Some(crate::fixtures::user(user_id)),
            guilds: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_guild(mut self, guild: GuildData) -> Self {
        self.guilds.insert(guild.id(), guild);
        self
    }
}

#[async_trait]
impl Api for CannedApi {
    async fn current_user(&self) -> Result<User, RestError> {
        self.user
            .clone()
            .ok_or_else(|| RestError::from_status(401, "no identity".to_string()))
    }

    async fn guild(&self, guild_id: Snowflake) -> Result<GuildData, RestError> {
        self.guilds
            .get(&guild_id)
            .cloned()
            .ok_or_else(|| RestError::NotFound(format!("guild {guild_id}")))
    }

    async fn channel(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> Result<Channel, RestError> {
        self.guilds
            .get(&guild_id)
            .and_then(|data| data.channels.iter().find(|c| c.id == channel_id))
            .cloned()
            .ok_or_else(|| RestError::NotFound(format!("channel {channel_id}")))
    }

    async fn member(&self, guild_id: Snowflake, member_id: Snowflake) -> Result<Member, RestError> {
        self.guilds
            .get(&guild_id)
            .and_then(|data| data.members.as_ref())
            .and_then(|members| members.iter().find(|m| m.user_id() == member_id))
            .cloned()
            .ok_or_else(|| RestError::NotFound(format!("member {member_id}")))
    }
}

/// Forwards every event name into an unbounded channel
pub struct EventProbe {
    sender: mpsc::UnboundedSender<String>,
}

impl EventProbe {
    /// Create a probe and the receiver its event names arrive on
    #[must_use]
    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }

    fn push(&self, name: &str) {
        let _ = self.sender.send(name.to_string());
    }
}

#[async_trait]
impl EventHandler for EventProbe {
    async fn socket_opened(&self, _client: &KuracordClient) -> anyhow::Result<()> {
        self.push("socket_opened");
        Ok(())
    }

    async fn socket_closed(
        &self,
        _client: &KuracordClient,
        _event: &SocketCloseEvent,
    ) -> anyhow::Result<()> {
        self.push("socket_closed");
        Ok(())
    }

    async fn socket_errored(
        &self,
        _client: &KuracordClient,
        _event: &SocketErrorEvent,
    ) -> anyhow::Result<()> {
        self.push("socket_errored");
        Ok(())
    }

    async fn ready(&self, _client: &KuracordClient, _event: &ReadyEvent) -> anyhow::Result<()> {
        self.push("ready");
        Ok(())
    }

    async fn heartbeated(
        &self,
        _client: &KuracordClient,
        _event: &HeartbeatEvent,
    ) -> anyhow::Result<()> {
        self.push("heartbeated");
        Ok(())
    }

    async fn zombied(&self, _client: &KuracordClient, _event: &ZombiedEvent) -> anyhow::Result<()> {
        self.push("zombied");
        Ok(())
    }

    async fn guild_created(
        &self,
        _client: &KuracordClient,
        _event: &GuildCreateEvent,
    ) -> anyhow::Result<()> {
        self.push("guild_created");
        Ok(())
    }

    async fn guild_available(
        &self,
        _client: &KuracordClient,
        _event: &GuildCreateEvent,
    ) -> anyhow::Result<()> {
        self.push("guild_available");
        Ok(())
    }

    async fn guild_updated(
        &self,
        _client: &KuracordClient,
        _event: &GuildUpdateEvent,
    ) -> anyhow::Result<()> {
        self.push("guild_updated");
        Ok(())
    }

    async fn guild_deleted(
        &self,
        _client: &KuracordClient,
        _event: &GuildDeleteEvent,
    ) -> anyhow::Result<()> {
        self.push("guild_deleted");
        Ok(())
    }

    async fn guild_download_completed(
        &self,
        _client: &KuracordClient,
        _event: &GuildDownloadCompletedEvent,
    ) -> anyhow::Result<()> {
        self.push("guild_download_completed");
        Ok(())
    }

    async fn channel_created(
        &self,
        _client: &KuracordClient,
        _event: &ChannelCreateEvent,
    ) -> anyhow::Result<()> {
        self.push("channel_created");
        Ok(())
    }

    async fn channel_updated(
        &self,
        _client: &KuracordClient,
        _event: &ChannelUpdateEvent,
    ) -> anyhow::Result<()> {
        self.push("channel_updated");
        Ok(())
    }

    async fn channel_deleted(
        &self,
        _client: &KuracordClient,
        _event: &ChannelDeleteEvent,
    ) -> anyhow::Result<()> {
        self.push("channel_deleted");
        Ok(())
    }

    async fn message_created(
        &self,
        _client: &KuracordClient,
        _event: &MessageCreateEvent,
    ) -> anyhow::Result<()> {
        self.push("message_created");
        Ok(())
    }

    async fn message_updated(
        &self,
        _client: &KuracordClient,
        _event: &MessageUpdateEvent,
    ) -> anyhow::Result<()> {
        self.push("message_updated");
        Ok(())
    }

    async fn message_deleted(
        &self,
        _client: &KuracordClient,
        _event: &MessageDeleteEvent,
    ) -> anyhow::Result<()> {
        self.push("message_deleted");
        Ok(())
    }

    async fn member_joined(
        &self,
        _client: &KuracordClient,
        _event: &MemberJoinEvent,
    ) -> anyhow::Result<()> {
        self.push("member_joined");
        Ok(())
    }

    async fn member_updated(
        &self,
        _client: &KuracordClient,
        _event: &MemberUpdateEvent,
    ) -> anyhow::Result<()> {
        self.push("member_updated");
        Ok(())
    }

    async fn member_left(
        &self,
        _client: &KuracordClient,
        _event: &MemberLeaveEvent,
    ) -> anyhow::Result<()> {
        self.push("member_left");
        Ok(())
    }

    async fn user_updated(
        &self,
        _client: &KuracordClient,
        _event: &UserUpdateEvent,
    ) -> anyhow::Result<()> {
        self.push("user_updated");
        Ok(())
    }

    async fn unknown_event(
        &self,
        _client: &KuracordClient,
        _event: &UnknownEvent,
    ) -> anyhow::Result<()> {
        self.push("unknown_event");
        Ok(())
    }

    async fn client_errored(
        &self,
        _client: &KuracordClient,
        _event: &ClientErrorEvent,
    ) -> anyhow::Result<()> {
        self.push("client_errored");
        Ok(())
    }
}

/// Wait until `name` comes out of the probe, ignoring everything else
///
/// # Panics
/// Panics after 10 seconds without a match.
pub async fn wait_for(receiver: &mut mpsc::UnboundedReceiver<String>, name: &str) {
    let deadline = Duration::from_secs(10);
    tokio::time::timeout(deadline, async {
        while let Some(event) = receiver.recv().await {
            if event == name {
                return;
            }
        }
        panic!("probe channel closed while waiting for {name}");
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {name}"));
}
