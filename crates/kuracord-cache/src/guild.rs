//! Cached guild representation

use kuracord_core::{Channel, Guild, GuildData, Member, Role, Snowflake};
use std::collections::HashMap;

/// A guild as held in the cache: scalar fields plus id-keyed collections
///
/// The entry for a guild id is created once and only ever mutated in place,
/// so everything hanging off the guild (channel foreign keys, member
/// entries) stays coherent across updates.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedGuild {
    /// Scalar guild fields
    pub guild: Guild,

    /// Channels keyed by channel id
    pub channels: HashMap<Snowflake, Channel>,

    /// Roles keyed by role id
    pub roles: HashMap<Snowflake, Role>,

    /// Members keyed by **user** id
    pub members: HashMap<Snowflake, Member>,
}

impl CachedGuild {
    /// Build a cached guild from a wire payload, rewiring every collection
    /// element's foreign key to this guild
    #[must_use]
    pub fn from_data(data: GuildData) -> Self {
        let GuildData {
            guild,
            channels,
            roles,
            members,
        } = data;
        let guild_id = guild.id;

        let mut cached = Self {
            guild,
            channels: HashMap::new(),
            roles: HashMap::new(),
            members: HashMap::new(),
        };

        for channel in channels {
            cached.insert_channel(guild_id, channel);
        }
        for role in roles {
            cached.insert_role(guild_id, role);
        }
        for member in members.unwrap_or_default() {
            cached.insert_member(guild_id, member);
        }

        cached
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> Snowflake {
        self.guild.id
    }

    /// Insert a channel unless one with the same id is already present
    ///
    /// Returns true if the channel was inserted.
    pub fn insert_channel(&mut self, guild_id: Snowflake, mut channel: Channel) -> bool {
        channel.guild_id = Some(guild_id);
        match self.channels.entry(channel.id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(channel);
                true
            }
        }
    }

    /// Insert a role unless one with the same id is already present
    pub fn insert_role(&mut self, guild_id: Snowflake, mut role: Role) -> bool {
        role.guild_id = guild_id;
        match self.roles.entry(role.id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(role);
                true
            }
        }
    }

    /// Insert a member unless the user already has an entry
    pub fn insert_member(&mut self, guild_id: Snowflake, mut member: Member) -> bool {
        member.guild_id = guild_id;
        member.guild = None;
        match self.members.entry(member.user_id()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(member);
                true
            }
        }
    }

    /// Replace the member collection with an authoritative snapshot
    pub fn replace_members(&mut self, guild_id: Snowflake, members: Vec<Member>) {
        self.members.clear();
        for mut member in members {
            member.guild_id = guild_id;
            member.guild = None;
            self.members.insert(member.user_id(), member);
        }
    }
}

/// The outcome of merging a guild payload into the cache
#[derive(Debug, Clone)]
pub struct GuildUpsert {
    /// Whether the guild was already cached before this merge
    pub existed: bool,

    /// Scalar fields as they were before the merge; `None` for a first
    /// insert
    pub before: Option<Guild>,

    /// The cached guild after the merge
    pub after: CachedGuild,
}
