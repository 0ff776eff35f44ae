//! # kuracord-rest
//!
//! The REST collaborator consumed by the gateway session: fetching the
//! current identity during connect and resolving guilds, channels, and
//! members on cache misses. The full REST surface (message sending, guild
//! management, ...) is intentionally out of scope.

mod api;
mod error;
mod http;
pub mod routes;

pub use api::Api;
pub use error::RestError;
pub use http::HttpApi;
