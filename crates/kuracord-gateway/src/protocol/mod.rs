//! Gateway wire protocol
//!
//! Op codes, the payload envelope, and close-code policy.

pub mod close_codes;
mod opcodes;
mod payloads;

pub use opcodes::GatewayOpCode;
pub use payloads::{GatewayPayload, HelloData, IdentifyData, ReadyData};
