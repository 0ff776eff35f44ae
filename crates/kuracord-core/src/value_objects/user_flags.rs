//! User account flags
//!
//! Badge bits attached to a user account, serialized as a plain number.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// User account badge flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UserFlags: u64 {
        /// Kuracord staff member
        const STAFF           = 1 << 0;
        /// Early supporter of the platform
        const EARLY_SUPPORTER = 1 << 1;
        /// Reported verified bugs
        const BUG_HUNTER      = 1 << 2;
        /// Account owned by a verified bot developer
        const VERIFIED_BOT    = 1 << 3;
    }
}

impl Serialize for UserFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for UserFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Ok(UserFlags::from_bits_truncate(bits))
    }
}
