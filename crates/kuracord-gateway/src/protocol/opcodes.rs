//! Gateway operation codes

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gateway operation codes
///
/// Op codes define the type of message exchanged over the WebSocket
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GatewayOpCode {
    /// Initial handshake with the gateway (client only)
    Identify = 0,
    /// Server dispatches a named event (server only)
    Dispatch = 1,
    /// Resume a closed connection (client only)
    Resume = 2,
    /// Sent when identify succeeds (server only)
    Ready = 3,
    /// Sent by the gateway upon connecting (server only)
    Hello = 4,
    /// Keep the connection alive (client only)
    Heartbeat = 5,
    /// Heartbeat acknowledged (server only)
    HeartbeatAck = 6,
}

impl GatewayOpCode {
    /// Create a `GatewayOpCode` from a raw integer value
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Identify),
            1 => Some(Self::Dispatch),
            2 => Some(Self::Resume),
            3 => Some(Self::Ready),
            4 => Some(Self::Hello),
            5 => Some(Self::Heartbeat),
            6 => Some(Self::HeartbeatAck),
            _ => None,
        }
    }

    /// Get the raw integer value
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this op code can be sent by the client
    #[must_use]
    pub const fn is_client_op(self) -> bool {
        matches!(self, Self::Identify | Self::Resume | Self::Heartbeat)
    }

    /// Get the name of this op code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identify => "Identify",
            Self::Dispatch => "Dispatch",
            Self::Resume => "Resume",
            Self::Ready => "Ready",
            Self::Hello => "Hello",
            Self::Heartbeat => "Heartbeat",
            Self::HeartbeatAck => "HeartbeatAck",
        }
    }
}

impl Serialize for GatewayOpCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for GatewayOpCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid op code: {value}")))
    }
}

impl std::fmt::Display for GatewayOpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}
