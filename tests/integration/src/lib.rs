//! Integration test utilities for the Kuracord client
//!
//! Provides an in-process mock gateway server, a canned REST collaborator,
//! and an event probe for driving real WebSocket handshakes end to end.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
