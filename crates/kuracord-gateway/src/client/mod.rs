//! The Kuracord client
//!
//! Owns the configuration, the REST collaborator, the entity cache, the
//! registered event handlers, and the live gateway session.

mod error;
mod socket;
#[cfg(test)]
pub(crate) mod testutil;

pub use error::GatewayError;

use crate::connection::{Outbound, SessionState};
use crate::events::{self, ClientErrorEvent, Event, EventHandler};
use kuracord_cache::{CachedGuild, EntityCache};
use kuracord_common::ClientConfig;
use kuracord_core::{Channel, Snowflake, User};
use kuracord_rest::{Api, HttpApi};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A client for the Kuracord chat service
///
/// Cheap to clone; clones share one connection and cache.
#[derive(Clone)]
pub struct KuracordClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) config: ClientConfig,
    pub(crate) api: Arc<dyn Api>,
    pub(crate) cache: EntityCache,
    pub(crate) handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
    pub(crate) current_user: RwLock<Option<User>>,
    pub(crate) state: SessionState,

    /// Client-level connection lock: held from `connect()` to socket close
    pub(crate) connected: AtomicBool,

    /// Session-start mutex: only one HELLO→IDENTIFY handshake at a time
    pub(crate) session_started: AtomicBool,

    /// Set before a client-initiated close that must reconnect regardless
    /// of the close code
    pub(crate) force_reconnect: AtomicBool,

    /// Live copy of `config.auto_reconnect`; cleared by `disconnect()`
    pub(crate) reconnect_enabled: AtomicBool,

    /// Sender for the current socket's writer task
    pub(crate) outbound: Mutex<Option<mpsc::Sender<Outbound>>>,

    /// Cancellation for the current session's background tasks
    pub(crate) cancel: Mutex<Option<CancellationToken>>,
}

impl KuracordClient {
    /// Create a client with the default HTTP REST collaborator
    pub fn new(config: ClientConfig) -> Result<Self, GatewayError> {
        let api = Arc::new(HttpApi::new(&config).map_err(GatewayError::from)?);
        Ok(Self::with_api(config, api))
    }

    /// Create a client with a custom REST collaborator
    #[must_use]
    pub fn with_api(config: ClientConfig, api: Arc<dyn Api>) -> Self {
        let cache = EntityCache::new(config.message_cache_size);
        let reconnect_enabled = AtomicBool::new(config.auto_reconnect);

        Self {
            inner: Arc::new(ClientInner {
                config,
                api,
                cache,
                handlers: RwLock::new(Vec::new()),
                current_user: RwLock::new(None),
                state: SessionState::new(),
                connected: AtomicBool::new(false),
                session_started: AtomicBool::new(false),
                force_reconnect: AtomicBool::new(false),
                reconnect_enabled,
                outbound: Mutex::new(None),
                cancel: Mutex::new(None),
            }),
        }
    }

    /// Register an event handler; handlers run in registration order
    pub fn register_handler(&self, handler: Arc<dyn EventHandler>) {
        self.inner.handlers.write().push(handler);
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The entity cache fed by the gateway
    #[must_use]
    pub fn cache(&self) -> &EntityCache {
        &self.inner.cache
    }

    /// The current user, once known (after `connect()` or READY)
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.current_user.read().clone()
    }

    pub(crate) fn current_user_id(&self) -> Option<Snowflake> {
        self.inner.current_user.read().as_ref().map(|user| user.id)
    }

    /// Snapshot of every cached guild
    #[must_use]
    pub fn guilds(&self) -> Vec<CachedGuild> {
        self.inner.cache.guilds_snapshot()
    }

    /// Most recent heartbeat round-trip time in milliseconds
    #[must_use]
    pub fn ping_ms(&self) -> i64 {
        self.inner.state.ping_ms()
    }

    /// Id of the current gateway session, if one is established
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.inner.state.session_id()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    pub(crate) fn session_state(&self) -> &SessionState {
        &self.inner.state
    }

    // === Cached-or-REST getters ===

    /// Get a guild, from the cache or the REST API on a miss
    ///
    /// A fetched guild is not inserted into the cache; the gateway owns
    /// cache membership.
    pub async fn guild(&self, guild_id: Snowflake) -> Result<CachedGuild, GatewayError> {
        if let Some(guild) = self.inner.cache.guild(guild_id) {
            return Ok(guild);
        }

        let data = self.inner.api.guild(guild_id).await?;
        Ok(CachedGuild::from_data(data))
    }

    /// Get a channel, from the cache or the REST API on a miss
    pub async fn channel(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> Result<Channel, GatewayError> {
        if let Some(channel) = self.inner.cache.find_channel(channel_id) {
            return Ok(channel);
        }

        Ok(self.inner.api.channel(guild_id, channel_id).await?)
    }

    // === Connection lifecycle ===

    /// Connect to the gateway
    ///
    /// Fetches the current identity, acquires the per-identity connection
    /// gate, and opens the socket. Transient failures are retried up to 5
    /// times with a doubling delay starting at 7.5 s (or forever with
    /// `reconnect_indefinitely`); authentication and unsupported-environment
    /// failures abort immediately.
    ///
    /// Returns once the socket is open; the handshake and event flow
    /// continue on background tasks.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        if self.inner.connected.swap(true, Ordering::SeqCst) {
            return Err(GatewayError::AlreadyConnected);
        }

        tracing::info!("kuracord-rs, version {}", env!("CARGO_PKG_VERSION"));

        const MAX_ATTEMPTS: u32 = 5;
        let mut delay = Duration::from_millis(7500);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            match self.connect_internal().await {
                Ok(()) => return Ok(()),
                Err(error) if error.is_fatal() => {
                    self.inner.connected.store(false, Ordering::SeqCst);
                    return Err(error);
                }
                Err(error) => {
                    let exhausted =
                        attempt >= MAX_ATTEMPTS && !self.inner.config.reconnect_indefinitely;
                    if exhausted {
                        self.inner.connected.store(false, Ordering::SeqCst);
                        return Err(GatewayError::ConnectionFailed {
                            attempts: attempt,
                            source: Box::new(error),
                        });
                    }

                    tracing::error!(
                        error = %error,
                        "Connection attempt failed, retrying in {}s",
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
            }
        }
    }

    /// Close the connection and stay down
    ///
    /// Disables automatic reconnection for this client before closing.
    pub async fn disconnect(&self) {
        self.inner.reconnect_enabled.store(false, Ordering::SeqCst);
        self.send_close(1000, "Disconnecting").await;
    }

    /// Close and reopen the connection
    ///
    /// With `start_new_session` the session id is dropped so the next
    /// handshake starts from scratch instead of resuming.
    pub async fn reconnect(&self, start_new_session: bool) {
        let code = if start_new_session {
            1000
        } else {
            crate::protocol::close_codes::RECONNECTING
        };
        self.request_reconnect(start_new_session, code, "Reconnecting").await;
    }

    /// Force a close that reconnects regardless of the close code
    pub(crate) async fn request_reconnect(
        &self,
        start_new_session: bool,
        code: u16,
        reason: &str,
    ) {
        if start_new_session {
            self.inner.state.set_session_id(None);
        }
        self.inner.force_reconnect.store(true, Ordering::SeqCst);
        self.send_close(code, reason).await;
    }

    async fn send_close(&self, code: u16, reason: &str) {
        let sender = self.inner.outbound.lock().clone();
        if let Some(sender) = sender {
            let _ = sender
                .send(Outbound::Close {
                    code,
                    reason: reason.to_string(),
                })
                .await;
        }
    }

    // === Events ===

    /// Invoke every registered handler for `event`, sequentially
    ///
    /// A handler error is logged and re-raised as a client-error event; it
    /// never reaches the dispatch loop.
    pub(crate) async fn emit(&self, event: Event) {
        let handlers: Vec<Arc<dyn EventHandler>> = self.inner.handlers.read().clone();

        for handler in &handlers {
            let Err(error) = events::dispatch_to_handler(handler.as_ref(), self, &event).await
            else {
                continue;
            };

            tracing::error!(event = event.name(), error = %error, "Event handler failed");

            if matches!(event, Event::ClientErrored(_)) {
                continue;
            }

            let client_error = Event::ClientErrored(ClientErrorEvent {
                event: event.name().to_string(),
                error: error.to_string(),
            });
            for handler in &handlers {
                if let Err(error) =
                    events::dispatch_to_handler(handler.as_ref(), self, &client_error).await
                {
                    tracing::error!(error = %error, "Client-error handler failed");
                }
            }
        }
    }

    // === Current-user maintenance ===

    pub(crate) fn set_current_user(&self, user: User) {
        *self.inner.current_user.write() = Some(user);
    }

    /// Copy the known-good subset of a `user_update` onto the current user
    ///
    /// The server sends `email`, `disabled`, `verified`, and `premiumType`
    /// as null placeholders on this event, so those fields keep their
    /// values from READY.
    pub(crate) fn apply_current_user_update(&self, incoming: &User) {
        let mut guard = self.inner.current_user.write();
        if let Some(current) = guard.as_mut() {
            current.id = incoming.id;
            current.username = incoming.username.clone();
            current.discriminator = incoming.discriminator.clone();
            current.biography = incoming.biography.clone();
            current.avatar = incoming.avatar.clone();
            current.bot = incoming.bot;
            current.flags = incoming.flags;
        }
    }

    // === Test support ===

    #[cfg(test)]
    pub(crate) fn attach_outbound_for_tests(&self, sender: mpsc::Sender<Outbound>) {
        *self.inner.outbound.lock() = Some(sender);
    }
}

impl std::fmt::Debug for KuracordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KuracordClient")
            .field("connected", &self.is_connected())
            .field("session_id", &self.session_id())
            .field("guilds", &self.inner.cache.guild_count())
            .finish()
    }
}
