//! # kuracord-cache
//!
//! In-memory entity cache fed by the gateway dispatcher: guild store with
//! per-guild channel/role/member maps, a global user store, and a bounded
//! ring buffer of recently seen messages.
//!
//! Dispatch handlers run sequentially on the gateway receive task, so the
//! merge operations here never contend with each other; the maps are still
//! concurrency-safe because consumers may read snapshots from other tasks.

mod guild;
mod messages;
mod store;

pub use guild::{CachedGuild, GuildUpsert};
pub use messages::MessageRing;
pub use store::{ChannelUpdate, EntityCache};
