//! # kuracord-gateway
//!
//! The gateway client: WebSocket connection lifecycle, the
//! HELLO→IDENTIFY→READY handshake, heartbeating with zombie detection,
//! payload decompression, and dispatch of typed events into the entity
//! cache.
//!
//! ```ignore
//! use kuracord_gateway::{ClientConfig, KuracordClient};
//!
//! let config = ClientConfig::new("my-token")?;
//! let client = KuracordClient::new(config)?;
//! client.register_handler(std::sync::Arc::new(MyHandler));
//! client.connect().await?;
//! ```

pub mod client;
pub mod codec;
pub mod connection;
pub mod dispatch;
pub mod events;
pub mod protocol;

// Re-export the public surface at crate root
pub use client::{GatewayError, KuracordClient};
pub use events::{Event, EventHandler};
pub use kuracord_cache::{CachedGuild, EntityCache};
pub use kuracord_common::{ClientConfig, CompressionMode, TokenType};
