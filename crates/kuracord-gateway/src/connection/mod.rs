//! Connection primitives
//!
//! Session state, the per-identity connection gate, and the heartbeat
//! monitor.

mod gate;
mod heartbeat;
mod state;

pub use gate::{gate_for, ConnectionGate};
pub use heartbeat::HeartbeatMonitor;
pub use state::SessionState;

use crate::protocol::GatewayPayload;

/// A message for the socket writer task
#[derive(Debug, Clone)]
pub enum Outbound {
    /// Serialize and send a payload as a text frame
    Payload(GatewayPayload),
    /// Send a close frame
    Close { code: u16, reason: String },
}
