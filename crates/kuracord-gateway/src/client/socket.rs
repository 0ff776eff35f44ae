//! Socket lifecycle: connect, the HELLO→IDENTIFY→READY handshake, opcode
//! routing, and close handling

use super::{GatewayError, KuracordClient};
use crate::codec::{DecodeError, Frame, PayloadCodec};
use crate::connection::{self, ConnectionGate, HeartbeatMonitor, Outbound};
use crate::dispatch;
use crate::events::{
    Event, GuildCreateEvent, GuildDownloadCompletedEvent, HeartbeatEvent, ReadyEvent,
    SocketCloseEvent, SocketErrorEvent,
};
use crate::protocol::{close_codes, GatewayOpCode, GatewayPayload};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::Ordering;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

impl KuracordClient {
    /// One connection attempt: identity fetch, gate, socket
    ///
    /// Returns a boxed future with a declared `Send` bound rather than an
    /// `async fn`'s opaque future. This breaks the `Send` auto-trait
    /// inference cycle formed by the `open_socket` → `read_loop` →
    /// `on_socket_close` → `connect` → `connect_internal` recursion, which
    /// rustc otherwise cannot resolve within this module's defining scope.
    pub(super) fn connect_internal(
        &self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), GatewayError>> + Send + '_>>
    {
        Box::pin(async move {
            self.initialize().await?;

            let identity = self.current_user_id().unwrap_or_default();
            let gate = connection::gate_for(identity);
            gate.acquire().await;

            match self.open_socket().await {
                Ok(()) => Ok(()),
                Err(error) => {
                    gate.release_now();
                    Err(error)
                }
            }
        })
    }

    /// Fetch the identity behind the token, once per client lifetime
    async fn initialize(&self) -> Result<(), GatewayError> {
        if self.current_user().is_some() {
            return Ok(());
        }

        let user = self.inner.api.current_user().await?;
        tracing::debug!(user_id = %user.id, "Current identity resolved");
        self.inner.cache.upsert_user(user.clone());
        self.set_current_user(user);
        Ok(())
    }

    async fn open_socket(&self) -> Result<(), GatewayError> {
        self.session_state().reset_skipped_heartbeats();
        self.inner.force_reconnect.store(false, Ordering::SeqCst);

        let cancel = CancellationToken::new();
        *self.inner.cancel.lock() = Some(cancel);

        tracing::debug!(url = %self.inner.config.gateway_url, "Connecting to gateway");

        let (socket, _response) = connect_async(self.inner.config.gateway_url.as_str())
            .await
            .map_err(|error| match error {
                tungstenite::Error::Url(inner) => GatewayError::Unsupported(inner.to_string()),
                other => GatewayError::Socket(other),
            })?;
        let (sink, stream) = socket.split();

        let (sender, receiver) = mpsc::channel::<Outbound>(64);
        *self.inner.outbound.lock() = Some(sender.clone());

        tokio::spawn(writer_task(self.clone(), sink, receiver));
        tokio::spawn(read_loop(self.clone(), stream, sender));

        self.emit(Event::SocketOpened).await;
        Ok(())
    }

    /// Route one decoded frame
    pub(crate) async fn handle_frame(
        &self,
        codec: &mut PayloadCodec,
        frame: Frame,
        outbound: &mpsc::Sender<Outbound>,
    ) {
        let payload = match codec.decode(frame) {
            Ok(payload) => payload,
            Err(DecodeError::Json(error)) => {
                tracing::warn!(error = %error, "Discarding frame with invalid payload");
                return;
            }
            Err(error) => {
                // frame-scoped: drop it, keep the connection
                tracing::error!(error = %error, "Payload decompression failed");
                return;
            }
        };

        tracing::trace!(payload = %payload, "Gateway payload received");

        // sequence numbers ride on any opcode
        self.session_state().observe_sequence(payload.s);

        let result = match payload.op {
            GatewayOpCode::Dispatch => {
                dispatch::handle(self, payload).await;
                Ok(())
            }
            GatewayOpCode::Hello => self.on_hello(&payload, outbound).await,
            GatewayOpCode::Ready => self.on_ready(payload).await,
            GatewayOpCode::HeartbeatAck => {
                self.on_heartbeat_ack().await;
                Ok(())
            }
            other => {
                tracing::warn!(op = %other, data = ?payload.d, "Unknown Kuracord opcode");
                Ok(())
            }
        };

        if let Err(error) = result {
            tracing::error!(error = %error, "Socket handler suppressed an exception");
        }
    }

    /// HELLO: take the session-start mutex, start heartbeating, identify
    async fn on_hello(
        &self,
        payload: &GatewayPayload,
        outbound: &mpsc::Sender<Outbound>,
    ) -> Result<(), GatewayError> {
        tracing::trace!("Received HELLO (OP4)");

        let hello = payload
            .hello_data()
            .ok_or(GatewayError::MalformedPayload("hello"))?;

        if self.inner.session_started.swap(true, Ordering::SeqCst) {
            // a stale or duplicate HELLO while a handshake is in flight
            tracing::warn!("Attempt to start a session while another session is active");
            return Ok(());
        }

        let identity = self.current_user_id().unwrap_or_default();
        connection::gate_for(identity).release_after(ConnectionGate::POST_HELLO_RELEASE);

        let cancel = self.inner.cancel.lock().clone().unwrap_or_default();
        let monitor =
            HeartbeatMonitor::new(self.clone(), hello.heartbeat, outbound.clone(), cancel);
        tokio::spawn(monitor.run());

        let identify = GatewayPayload::identify(self.inner.config.formatted_token());
        if outbound.send(Outbound::Payload(identify)).await.is_err() {
            tracing::debug!("Socket closed before IDENTIFY could be sent");
        }

        Ok(())
    }

    /// READY: adopt the identity, rebuild the guild cache, go live
    async fn on_ready(&self, payload: GatewayPayload) -> Result<(), GatewayError> {
        let ready = payload
            .ready_data()
            .ok_or(GatewayError::MalformedPayload("ready"))?;

        tracing::trace!(session_id = %ready.session_id, "Received READY (OP3)");

        let mut user = ready.user;
        let memberships = user.guild_memberships.take().unwrap_or_default();

        // every READY is a fresh (non-resumed) session
        self.session_state().reset_for_new_session();

        self.inner.cache.upsert_user(user.clone());
        self.set_current_user(user);
        self.session_state().set_session_id(Some(ready.session_id.clone()));

        self.inner.cache.clear_guilds();

        for membership in memberships {
            let guild_id = membership.guild.id;

            let cached = match self.inner.cache.guild(guild_id) {
                Some(cached) => cached,
                None => match self.inner.api.guild(guild_id).await {
                    Ok(data) => self.inner.cache.upsert_guild(data).after,
                    Err(error) => {
                        tracing::error!(
                            guild_id = %guild_id,
                            error = %error,
                            "Failed to resolve guild from READY"
                        );
                        continue;
                    }
                },
            };

            self.emit(Event::GuildAvailable(GuildCreateEvent { guild: cached })).await;
        }

        self.session_state().mark_guild_download_completed();
        self.emit(Event::GuildDownloadCompleted(GuildDownloadCompletedEvent {
            guilds: self.inner.cache.guilds_snapshot(),
        }))
        .await;
        self.emit(Event::Ready(ReadyEvent {
            session_id: ready.session_id,
        }))
        .await;

        Ok(())
    }

    async fn on_heartbeat_ack(&self) {
        let ping = self.session_state().record_heartbeat_ack();
        tracing::trace!(ping_ms = ping, "Received HEARTBEAT_ACK (OP6)");

        self.emit(Event::Heartbeated(HeartbeatEvent {
            ping_ms: ping,
            timestamp: chrono::Utc::now(),
        }))
        .await;
    }

    /// Socket closed: release the locks, cancel the session, maybe
    /// reconnect
    pub(crate) async fn on_socket_close(&self, code: u16, reason: String) {
        self.inner.session_started.store(false, Ordering::SeqCst);
        self.inner.connected.store(false, Ordering::SeqCst);
        *self.inner.outbound.lock() = None;

        if let Some(cancel) = self.inner.cancel.lock().take() {
            cancel.cancel();
        }

        tracing::debug!(code, reason = %reason, "Connection closed");
        self.emit(Event::SocketClosed(SocketCloseEvent {
            code,
            reason: reason.clone(),
        }))
        .await;

        let force = self.inner.force_reconnect.swap(false, Ordering::SeqCst);
        let auto = self.inner.reconnect_enabled.load(Ordering::SeqCst);

        if force || (auto && close_codes::should_reconnect(code)) {
            tracing::error!(code, reason = %reason, "Connection terminated, reconnecting");

            let client = self.clone();
            tokio::spawn(async move {
                if let Err(error) = client.connect().await {
                    tracing::error!(error = %error, "Reconnect failed");
                }
            });
        } else {
            tracing::info!(code, reason = %reason, "Connection terminated");
        }
    }
}

/// Drains the outbound channel into the socket sink
async fn writer_task(
    client: KuracordClient,
    mut sink: SplitSink<WsStream, Message>,
    mut receiver: mpsc::Receiver<Outbound>,
) {
    while let Some(outbound) = receiver.recv().await {
        let result = match outbound {
            Outbound::Payload(payload) => match payload.to_json() {
                Ok(json) => {
                    tracing::trace!(payload = %json, "Gateway payload sent");
                    sink.send(Message::Text(json)).await
                }
                Err(error) => {
                    tracing::warn!(error = %error, "Failed to serialize outbound payload");
                    Ok(())
                }
            },
            Outbound::Close { code, reason } => {
                tracing::debug!(code, "Sending close frame");
                let frame = CloseFrame {
                    code: code.into(),
                    reason: reason.into(),
                };
                let _ = sink.send(Message::Close(Some(frame))).await;
                break;
            }
        };

        if let Err(error) = result {
            tracing::error!(error = %error, "Socket send failed");
            client
                .emit(Event::SocketErrored(SocketErrorEvent {
                    error: error.to_string(),
                }))
                .await;
            break;
        }
    }
}

/// Reads frames until the socket closes, then runs close handling
async fn read_loop(
    client: KuracordClient,
    mut stream: SplitStream<WsStream>,
    outbound: mpsc::Sender<Outbound>,
) {
    let mut codec = PayloadCodec::new(client.inner.config.compression);
    let mut close_code: u16 = 1000;
    let mut close_reason = String::new();

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                client.handle_frame(&mut codec, Frame::Text(text), &outbound).await;
            }
            Ok(Message::Binary(bytes)) => {
                client.handle_frame(&mut codec, Frame::Binary(bytes), &outbound).await;
            }
            Ok(Message::Close(frame)) => {
                if let Some(frame) = frame {
                    close_code = frame.code.into();
                    close_reason = frame.reason.to_string();
                }
                break;
            }
            // pings/pongs are answered by the transport
            Ok(_) => {}
            Err(error) => {
                tracing::error!(error = %error, "Socket receive failed");
                client
                    .emit(Event::SocketErrored(SocketErrorEvent {
                        error: error.to_string(),
                    }))
                    .await;
                break;
            }
        }
    }

    client.on_socket_close(close_code, close_reason).await;
}
