//! Value objects
//!
//! Small copyable types with identity semantics: ids and flag sets.

mod permissions;
mod snowflake;
mod user_flags;

pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeParseError};
pub use user_flags::UserFlags;
