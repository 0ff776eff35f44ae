//! Gateway client errors

use kuracord_rest::RestError;
use tokio_tungstenite::tungstenite;

/// Errors raised by the gateway client
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// `connect()` was called while a connection is active
    #[error("This client is already connected")]
    AlreadyConnected,

    /// The token was rejected; never retried
    #[error("Authentication failed. Check your token and try again.")]
    Authentication(#[source] RestError),

    /// A REST call failed for a non-auth reason
    #[error(transparent)]
    Rest(RestError),

    /// WebSocket transport failure
    #[error("WebSocket error: {0}")]
    Socket(#[from] tungstenite::Error),

    /// The environment cannot run this client (bad URL scheme, missing TLS
    /// support); never retried
    #[error("Unsupported environment: {0}")]
    Unsupported(String),

    /// Every connection attempt failed
    #[error("Could not connect to Kuracord after {attempts} attempts")]
    ConnectionFailed {
        attempts: u32,
        #[source]
        source: Box<GatewayError>,
    },

    /// A protocol payload was not the expected shape
    #[error("Malformed {0} payload")]
    MalformedPayload(&'static str),
}

impl GatewayError {
    /// Whether retrying the connection can possibly help
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_) | Self::Unsupported(_) | Self::AlreadyConnected
        )
    }
}

impl From<RestError> for GatewayError {
    fn from(error: RestError) -> Self {
        if error.is_auth() {
            Self::Authentication(error)
        } else {
            Self::Rest(error)
        }
    }
}
