//! Public events
//!
//! Dispatch handlers translate gateway traffic into [`Event`] values and
//! invoke every registered [`EventHandler`] sequentially. An error returned
//! by consumer code is caught, logged, and re-raised as a
//! [`ClientErrorEvent`] instead of propagating into the dispatch loop.

mod payloads;

pub use payloads::{
    ChannelCreateEvent, ChannelDeleteEvent, ChannelUpdateEvent, ClientErrorEvent, DeletedMessage,
    GuildCreateEvent, GuildDeleteEvent, GuildDownloadCompletedEvent, GuildUpdateEvent,
    HeartbeatEvent, MemberJoinEvent, MemberLeaveEvent, MemberUpdateEvent, MessageCreateEvent,
    MessageDeleteEvent, MessageUpdateEvent, ReadyEvent, SocketCloseEvent, SocketErrorEvent,
    UnknownEvent, UserUpdateEvent, ZombiedEvent,
};

use crate::client::KuracordClient;
use async_trait::async_trait;

/// Everything the client can raise
#[derive(Debug, Clone)]
pub enum Event {
    SocketOpened,
    SocketClosed(SocketCloseEvent),
    SocketErrored(SocketErrorEvent),
    Ready(ReadyEvent),
    Heartbeated(HeartbeatEvent),
    Zombied(ZombiedEvent),
    GuildCreated(GuildCreateEvent),
    GuildAvailable(GuildCreateEvent),
    GuildUpdated(GuildUpdateEvent),
    GuildDeleted(GuildDeleteEvent),
    GuildDownloadCompleted(GuildDownloadCompletedEvent),
    ChannelCreated(ChannelCreateEvent),
    ChannelUpdated(ChannelUpdateEvent),
    ChannelDeleted(ChannelDeleteEvent),
    MessageCreated(MessageCreateEvent),
    MessageUpdated(MessageUpdateEvent),
    MessageDeleted(MessageDeleteEvent),
    MemberJoined(MemberJoinEvent),
    MemberUpdated(MemberUpdateEvent),
    MemberLeft(MemberLeaveEvent),
    UserUpdated(UserUpdateEvent),
    UnknownEvent(UnknownEvent),
    ClientErrored(ClientErrorEvent),
}

impl Event {
    /// Stable name used in logs and client-error reports
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SocketOpened => "SOCKET_OPENED",
            Self::SocketClosed(_) => "SOCKET_CLOSED",
            Self::SocketErrored(_) => "SOCKET_ERRORED",
            Self::Ready(_) => "READY",
            Self::Heartbeated(_) => "HEARTBEATED",
            Self::Zombied(_) => "ZOMBIED",
            Self::GuildCreated(_) => "GUILD_CREATED",
            Self::GuildAvailable(_) => "GUILD_AVAILABLE",
            Self::GuildUpdated(_) => "GUILD_UPDATED",
            Self::GuildDeleted(_) => "GUILD_DELETED",
            Self::GuildDownloadCompleted(_) => "GUILD_DOWNLOAD_COMPLETED",
            Self::ChannelCreated(_) => "CHANNEL_CREATED",
            Self::ChannelUpdated(_) => "CHANNEL_UPDATED",
            Self::ChannelDeleted(_) => "CHANNEL_DELETED",
            Self::MessageCreated(_) => "MESSAGE_CREATED",
            Self::MessageUpdated(_) => "MESSAGE_UPDATED",
            Self::MessageDeleted(_) => "MESSAGE_DELETED",
            Self::MemberJoined(_) => "MEMBER_JOINED",
            Self::MemberUpdated(_) => "MEMBER_UPDATED",
            Self::MemberLeft(_) => "MEMBER_LEFT",
            Self::UserUpdated(_) => "USER_UPDATED",
            Self::UnknownEvent(_) => "UNKNOWN_EVENT",
            Self::ClientErrored(_) => "CLIENT_ERRORED",
        }
    }
}

/// Consumer-facing event callbacks
///
/// Every method has a no-op default; implement the ones you care about.
/// Returning an error never kills the connection: it is logged and
/// surfaced through [`EventHandler::client_errored`].
#[async_trait]
#[allow(unused_variables)]
pub trait EventHandler: Send + Sync {
    async fn socket_opened(&self, client: &KuracordClient) -> anyhow::Result<()> {
        Ok(())
    }

    async fn socket_closed(
        &self,
        client: &KuracordClient,
        event: &SocketCloseEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn socket_errored(
        &self,
        client: &KuracordClient,
        event: &SocketErrorEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn ready(&self, client: &KuracordClient, event: &ReadyEvent) -> anyhow::Result<()> {
        Ok(())
    }

    async fn heartbeated(
        &self,
        client: &KuracordClient,
        event: &HeartbeatEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn zombied(&self, client: &KuracordClient, event: &ZombiedEvent) -> anyhow::Result<()> {
        Ok(())
    }

    async fn guild_created(
        &self,
        client: &KuracordClient,
        event: &GuildCreateEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn guild_available(
        &self,
        client: &KuracordClient,
        event: &GuildCreateEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn guild_updated(
        &self,
        client: &KuracordClient,
        event: &GuildUpdateEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn guild_deleted(
        &self,
        client: &KuracordClient,
        event: &GuildDeleteEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn guild_download_completed(
        &self,
        client: &KuracordClient,
        event: &GuildDownloadCompletedEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn channel_created(
        &self,
        client: &KuracordClient,
        event: &ChannelCreateEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn channel_updated(
        &self,
        client: &KuracordClient,
        event: &ChannelUpdateEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn channel_deleted(
        &self,
        client: &KuracordClient,
        event: &ChannelDeleteEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn message_created(
        &self,
        client: &KuracordClient,
        event: &MessageCreateEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn message_updated(
        &self,
        client: &KuracordClient,
        event: &MessageUpdateEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn message_deleted(
        &self,
        client: &KuracordClient,
        event: &MessageDeleteEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn member_joined(
        &self,
        client: &KuracordClient,
        event: &MemberJoinEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn member_updated(
        &self,
        client: &KuracordClient,
        event: &MemberUpdateEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn member_left(
        &self,
        client: &KuracordClient,
        event: &MemberLeaveEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn user_updated(
        &self,
        client: &KuracordClient,
        event: &UserUpdateEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn unknown_event(
        &self,
        client: &KuracordClient,
        event: &UnknownEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn client_errored(
        &self,
        client: &KuracordClient,
        event: &ClientErrorEvent,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Route an event to the matching handler method
pub(crate) async fn dispatch_to_handler(
    handler: &dyn EventHandler,
    client: &KuracordClient,
    event: &Event,
) -> anyhow::Result<()> {
    match event {
        Event::SocketOpened => handler.socket_opened(client).await,
        Event::SocketClosed(e) => handler.socket_closed(client, e).await,
        Event::SocketErrored(e) => handler.socket_errored(client, e).await,
        Event::Ready(e) => handler.ready(client, e).await,
        Event::Heartbeated(e) => handler.heartbeated(client, e).await,
        Event::Zombied(e) => handler.zombied(client, e).await,
        Event::GuildCreated(e) => handler.guild_created(client, e).await,
        Event::GuildAvailable(e) => handler.guild_available(client, e).await,
        Event::GuildUpdated(e) => handler.guild_updated(client, e).await,
        Event::GuildDeleted(e) => handler.guild_deleted(client, e).await,
        Event::GuildDownloadCompleted(e) => handler.guild_download_completed(client, e).await,
        Event::ChannelCreated(e) => handler.channel_created(client, e).await,
        Event::ChannelUpdated(e) => handler.channel_updated(client, e).await,
        Event::ChannelDeleted(e) => handler.channel_deleted(client, e).await,
        Event::MessageCreated(e) => handler.message_created(client, e).await,
        Event::MessageUpdated(e) => handler.message_updated(client, e).await,
        Event::MessageDeleted(e) => handler.message_deleted(client, e).await,
        Event::MemberJoined(e) => handler.member_joined(client, e).await,
        Event::MemberUpdated(e) => handler.member_updated(client, e).await,
        Event::MemberLeft(e) => handler.member_left(client, e).await,
        Event::UserUpdated(e) => handler.user_updated(client, e).await,
        Event::UnknownEvent(e) => handler.unknown_event(client, e).await,
        Event::ClientErrored(e) => handler.client_errored(client, e).await,
    }
}
