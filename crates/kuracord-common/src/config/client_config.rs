//! Client configuration struct
//!
//! Built programmatically or loaded from environment variables.

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Configuration for a Kuracord client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Authentication token, stored trimmed
    token: String,

    /// How the token is formatted for the Authorization header and IDENTIFY
    pub token_type: TokenType,

    /// WebSocket gateway URL
    pub gateway_url: String,

    /// Base URL of the REST API
    pub rest_url: String,

    /// Reconnect automatically when the connection drops
    pub auto_reconnect: bool,

    /// Keep retrying a failed connect forever instead of giving up after
    /// the bounded attempt count
    pub reconnect_indefinitely: bool,

    /// Capacity of the recent-message ring buffer; 0 disables caching
    pub message_cache_size: usize,

    /// Gateway payload compression handling
    pub compression: CompressionMode,

    /// Timeout for REST requests
    pub http_timeout: Duration,

    /// Emit a warning for dispatch events this library does not know
    pub log_unknown_events: bool,
}

impl ClientConfig {
    /// Default gateway URL
    pub const GATEWAY_URL: &'static str = "wss://gateway.kuracord.tk/v3";

    /// Default REST API base URL
    pub const REST_URL: &'static str = "https://api.kuracord.tk/api/v3";

    /// Default message cache capacity
    pub const MESSAGE_CACHE_SIZE: usize = 1024;

    /// Create a configuration with the given token and defaults everywhere
    /// else
    ///
    /// # Errors
    /// Returns `ConfigError::EmptyToken` if the token is empty or all
    /// whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        Ok(Self {
            token,
            token_type: TokenType::Bot,
            gateway_url: Self::GATEWAY_URL.to_string(),
            rest_url: Self::REST_URL.to_string(),
            auto_reconnect: true,
            reconnect_indefinitely: false,
            message_cache_size: Self::MESSAGE_CACHE_SIZE,
            compression: CompressionMode::Stream,
            http_timeout: Duration::from_secs(100),
            log_unknown_events: true,
        })
    }

    /// Load configuration from environment variables
    ///
    /// Reads `KURACORD_TOKEN` (required), `KURACORD_TOKEN_TYPE`,
    /// `KURACORD_GATEWAY_URL`, and `KURACORD_REST_URL`. A `.env` file is
    /// honored when present.
    ///
    /// # Errors
    /// Returns an error if `KURACORD_TOKEN` is missing or a variable holds
    /// an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let token = env::var("KURACORD_TOKEN").map_err(|_| ConfigError::MissingVar("KURACORD_TOKEN"))?;
        let mut config = Self::new(token)?;

        if let Ok(token_type) = env::var("KURACORD_TOKEN_TYPE") {
            config.token_type = match token_type.to_lowercase().as_str() {
                "user" => TokenType::User,
                "bot" => TokenType::Bot,
                "bearer" => TokenType::Bearer,
                other => {
                    return Err(ConfigError::InvalidValue("KURACORD_TOKEN_TYPE", other.to_string()))
                }
            };
        }

        if let Ok(url) = env::var("KURACORD_GATEWAY_URL") {
            config.gateway_url = url;
        }

        if let Ok(url) = env::var("KURACORD_REST_URL") {
            config.rest_url = url;
        }

        Ok(config)
    }

    /// Set the token type
    #[must_use]
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    /// Override the gateway URL
    #[must_use]
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    /// Override the REST base URL
    #[must_use]
    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.rest_url = url.into();
        self
    }

    /// Enable or disable automatic reconnection
    #[must_use]
    pub fn with_auto_reconnect(mut self, auto_reconnect: bool) -> Self {
        self.auto_reconnect = auto_reconnect;
        self
    }

    /// Retry failed connects indefinitely
    ///
    /// This swallows every transient connection error, which is rarely what
    /// a bot wants; the bounded default is safer.
    #[must_use]
    pub fn with_reconnect_indefinitely(mut self, indefinitely: bool) -> Self {
        self.reconnect_indefinitely = indefinitely;
        self
    }

    /// Set the message cache capacity; 0 disables message caching
    #[must_use]
    pub fn with_message_cache_size(mut self, size: usize) -> Self {
        self.message_cache_size = size;
        self
    }

    /// Set the payload compression mode
    #[must_use]
    pub fn with_compression(mut self, compression: CompressionMode) -> Self {
        self.compression = compression;
        self
    }

    /// Set the REST request timeout
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Control unknown-event warnings
    #[must_use]
    pub fn with_log_unknown_events(mut self, log: bool) -> Self {
        self.log_unknown_events = log;
        self
    }

    /// The token formatted with its type prefix, as IDENTIFY and the
    /// Authorization header expect it
    #[must_use]
    pub fn formatted_token(&self) -> String {
        match self.token_type {
            TokenType::User => self.token.clone(),
            TokenType::Bot => format!("Bot {}", self.token),
            TokenType::Bearer => format!("Bearer {}", self.token),
        }
    }
}

/// The kind of token used to identify the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// A user account token, sent raw
    User,
    /// A bot token, sent with the `Bot` prefix
    #[default]
    Bot,
    /// An OAuth bearer token, sent with the `Bearer` prefix
    Bearer,
}

/// How gateway binary frames are decompressed
///
/// Uncompressed operation is not offered; the gateway always compresses
/// binary frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    /// One DEFLATE context per message
    Payload,
    /// A single DEFLATE context shared across the whole connection
    #[default]
    Stream,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Token cannot be empty or all whitespace")]
    EmptyToken,

    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
