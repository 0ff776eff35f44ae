//! Permission bitflags for guild roles
//!
//! Six permissions stored as a 64-bit integer bitfield, serialized as a
//! plain number the way the API sends them.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Role permission flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        /// View channels and read messages
        const VIEW_CHANNELS       = 1 << 0;
        /// Send messages in text channels
        const SEND_MESSAGES       = 1 << 1;
        /// Kick members from the guild
        const KICK_MEMBERS        = 1 << 2;
        /// Ban members from the guild
        const BAN_MEMBERS         = 1 << 3;
        /// Bypass all permission checks
        const ADMINISTRATOR       = 1 << 4;
        /// Administrator scoped to a single guild
        const LOCAL_ADMINISTRATOR = 1 << 5;

        /// Every permission a freshly created guild grants its owner
        const FULL = Self::VIEW_CHANNELS.bits()
            | Self::SEND_MESSAGES.bits()
            | Self::KICK_MEMBERS.bits()
            | Self::BAN_MEMBERS.bits();
    }
}

impl Permissions {
    /// Check if the permission set contains a required permission
    ///
    /// Administrators bypass all permission checks.
    #[inline]
    #[must_use]
    pub fn has(&self, permission: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.contains(permission)
    }

    /// Add permissions to the set
    #[inline]
    #[must_use]
    pub fn grant(self, permissions: Permissions) -> Self {
        self | permissions
    }

    /// Remove permissions from the set
    #[inline]
    #[must_use]
    pub fn revoke(self, permissions: Permissions) -> Self {
        self & !permissions
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Ok(Permissions::from_bits_truncate(bits))
    }
}
