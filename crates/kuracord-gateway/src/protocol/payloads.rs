//! Gateway payload envelope and handshake payloads

use super::GatewayOpCode;
use kuracord_core::User;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The envelope every gateway message travels in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayload {
    /// Operation code
    pub op: GatewayOpCode,

    /// Payload data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,

    /// Sequence number; may accompany any opcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event name, only for Dispatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayPayload {
    // === Outbound constructors ===

    /// Create an IDENTIFY payload (op 0) with a pre-formatted token
    #[must_use]
    pub fn identify(token: String) -> Self {
        Self {
            op: GatewayOpCode::Identify,
            d: Some(serde_json::json!({ "token": token })),
            s: None,
            t: None,
        }
    }

    /// Create a heartbeat payload (op 5) echoing the last observed sequence
    #[must_use]
    pub fn heartbeat(sequence: Option<u64>) -> Self {
        Self {
            op: GatewayOpCode::Heartbeat,
            d: None,
            s: sequence,
            t: None,
        }
    }

    // === Inbound data accessors ===

    /// Parse the data of a HELLO payload (op 4)
    #[must_use]
    pub fn hello_data(&self) -> Option<HelloData> {
        if self.op != GatewayOpCode::Hello {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// Parse the data of a READY payload (op 3)
    #[must_use]
    pub fn ready_data(&self) -> Option<ReadyData> {
        if self.op != GatewayOpCode::Ready {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    /// The dispatch event name, if any
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        self.t.as_deref()
    }

    // === Serialization ===

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GatewayPayload(op={}", self.op)?;
        if let Some(t) = &self.t {
            write!(f, ", t={t}")?;
        }
        if let Some(s) = self.s {
            write!(f, ", s={s}")?;
        }
        write!(f, ")")
    }
}

/// Data of a HELLO payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloData {
    /// Heartbeat interval in milliseconds
    pub heartbeat: u64,
}

/// Data of an IDENTIFY payload sent by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyData {
    /// Pre-formatted token: `"<TypePrefix> <rawToken>"`
    pub token: String,
}

/// Data of a READY payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyData {
    /// Id of the session the gateway just started
    pub session_id: String,

    /// The current user, with nested guild memberships
    pub user: User,
}
