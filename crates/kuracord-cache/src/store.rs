//! Entity cache store
//!
//! `DashMap`-backed stores for guilds and users plus the message ring.
//! Every lookup returns an owned snapshot (`Option`); callers that require
//! presence decide what a miss means at the call site.

use crate::guild::{CachedGuild, GuildUpsert};
use crate::messages::MessageRing;
use dashmap::DashMap;
use kuracord_core::{Channel, GuildData, Member, Snowflake, User};

/// The before/after pair produced by a channel update
#[derive(Debug, Clone)]
pub struct ChannelUpdate {
    /// State before the update; `None` when the channel was not cached
    pub before: Option<Channel>,
    /// State after the update
    pub after: Channel,
    /// Owning guild, when one is known
    pub guild_id: Option<Snowflake>,
}

/// In-memory store of guilds, users, and recent messages
#[derive(Debug)]
pub struct EntityCache {
    guilds: DashMap<Snowflake, CachedGuild>,
    users: DashMap<Snowflake, User>,
    messages: MessageRing,
}

impl EntityCache {
    /// Create a cache with the given message ring capacity
    #[must_use]
    pub fn new(message_cache_size: usize) -> Self {
        Self {
            guilds: DashMap::new(),
            users: DashMap::new(),
            messages: MessageRing::new(message_cache_size),
        }
    }

    // === Guilds ===

    /// Merge a guild payload into the cache
    ///
    /// First sight inserts the guild as-is. For a cached guild the entry is
    /// mutated in place: channels and roles are appended when their id is
    /// new, an accompanying member list replaces the member collection
    /// wholesale, and the scalar fields are overwritten. The entry itself
    /// is never replaced, so the guild's identity is stable for as long as
    /// it stays cached.
    pub fn upsert_guild(&self, data: GuildData) -> GuildUpsert {
        let guild_id = data.id();

        if let Some(mut entry) = self.guilds.get_mut(&guild_id) {
            let cached = entry.value_mut();
            let before = cached.guild.clone();

            let GuildData {
                guild,
                channels,
                roles,
                members,
            } = data;

            for channel in channels {
                cached.insert_channel(guild_id, channel);
            }
            for role in roles {
                cached.insert_role(guild_id, role);
            }
            if let Some(members) = members {
                cached.replace_members(guild_id, members);
            }
            cached.guild = guild;

            return GuildUpsert {
                existed: true,
                before: Some(before),
                after: cached.clone(),
            };
        }

        let cached = CachedGuild::from_data(data);
        let after = cached.clone();
        self.guilds.insert(guild_id, cached);

        tracing::debug!(guild_id = %guild_id, "Guild cached");

        GuildUpsert {
            existed: false,
            before: None,
            after,
        }
    }

    /// Remove a guild, returning it if it was cached
    pub fn remove_guild(&self, guild_id: Snowflake) -> Option<CachedGuild> {
        self.guilds.remove(&guild_id).map(|(_, guild)| guild)
    }

    /// Drop every cached guild (a new session starts from a clean slate)
    pub fn clear_guilds(&self) {
        self.guilds.clear();
    }

    /// Look up a guild by id
    #[must_use]
    pub fn guild(&self, guild_id: Snowflake) -> Option<CachedGuild> {
        self.guilds.get(&guild_id).map(|entry| entry.value().clone())
    }

    #[must_use]
    pub fn contains_guild(&self, guild_id: Snowflake) -> bool {
        self.guilds.contains_key(&guild_id)
    }

    #[must_use]
    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    /// Copy-on-read snapshot of every cached guild
    #[must_use]
    pub fn guilds_snapshot(&self) -> Vec<CachedGuild> {
        self.guilds.iter().map(|entry| entry.value().clone()).collect()
    }

    // === Channels ===

    /// Find a channel by id with a linear scan across all cached guilds
    ///
    /// There is no global channel index; the scan is the lookup.
    #[must_use]
    pub fn find_channel(&self, channel_id: Snowflake) -> Option<Channel> {
        self.guilds
            .iter()
            .find_map(|entry| entry.channels.get(&channel_id).cloned())
    }

    /// Add a channel to a guild, skipping the insert when the id is taken
    ///
    /// Returns the cached channel, or `None` when the guild is unknown.
    pub fn add_channel(&self, guild_id: Snowflake, channel: Channel) -> Option<Channel> {
        let mut entry = self.guilds.get_mut(&guild_id)?;
        let cached = entry.value_mut();
        let channel_id = channel.id;
        cached.insert_channel(guild_id, channel);
        cached.channels.get(&channel_id).cloned()
    }

    /// Apply a channel update
    ///
    /// When the channel is cached its mutable fields are changed in place
    /// and the prior state is captured. When only the guild is cached the
    /// incoming channel replaces whatever entry shares its id. When neither
    /// is cached the incoming payload is returned as both states with no
    /// before.
    pub fn update_channel(
        &self,
        guild_hint: Option<Snowflake>,
        incoming: &Channel,
    ) -> ChannelUpdate {
        // in-place mutation path: the channel is somewhere in the cache
        for mut entry in self.guilds.iter_mut() {
            let guild_id = entry.id();
            if let Some(cached) = entry.channels.get_mut(&incoming.id) {
                let before = cached.clone();
                cached.name = incoming.name.clone();
                cached.channel_type = incoming.channel_type;
                return ChannelUpdate {
                    before: Some(before),
                    after: cached.clone(),
                    guild_id: Some(guild_id),
                };
            }
        }

        // fallback: replace by id in the payload's guild
        if let Some(guild_id) = guild_hint {
            if let Some(mut entry) = self.guilds.get_mut(&guild_id) {
                let cached = entry.value_mut();
                let mut channel = incoming.clone();
                channel.guild_id = Some(guild_id);
                cached.channels.insert(channel.id, channel.clone());
                return ChannelUpdate {
                    before: None,
                    after: channel,
                    guild_id: Some(guild_id),
                };
            }
        }

        ChannelUpdate {
            before: None,
            after: incoming.clone(),
            guild_id: guild_hint,
        }
    }

    /// Remove a channel from a guild by id
    ///
    /// `None` when the guild or the channel is not cached.
    pub fn remove_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> Option<Channel> {
        let mut entry = self.guilds.get_mut(&guild_id)?;
        entry.value_mut().channels.remove(&channel_id)
    }

    // === Members ===

    /// Add a member to a guild, deduplicated by user id
    ///
    /// `None` when the guild is unknown; `Some(inserted)` otherwise.
    pub fn add_member(&self, guild_id: Snowflake, member: Member) -> Option<bool> {
        let mut entry = self.guilds.get_mut(&guild_id)?;
        Some(entry.value_mut().insert_member(guild_id, member))
    }

    /// Replace a member entry: the old entity is removed and the updated
    /// one inserted (members are not mutated in place)
    ///
    /// `None` when the guild is unknown; the inner option is the prior
    /// member if the user already had an entry.
    pub fn replace_member(&self, guild_id: Snowflake, mut member: Member) -> Option<Option<Member>> {
        let mut entry = self.guilds.get_mut(&guild_id)?;
        let cached = entry.value_mut();
        member.guild_id = guild_id;
        member.guild = None;
        let before = cached.members.remove(&member.user_id());
        cached.members.insert(member.user_id(), member);
        Some(before)
    }

    /// Remove a member by user id
    ///
    /// `None` when the guild is unknown; the inner option is the removed
    /// member, if present.
    pub fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Option<Member>> {
        let mut entry = self.guilds.get_mut(&guild_id)?;
        Some(entry.value_mut().members.remove(&user_id))
    }

    /// Look up a member by guild and user id
    #[must_use]
    pub fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Member> {
        self.guilds
            .get(&guild_id)
            .and_then(|entry| entry.members.get(&user_id).cloned())
    }

    // === Users ===

    /// Upsert a user, last write wins
    pub fn upsert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Look up a user by id
    #[must_use]
    pub fn user(&self, user_id: Snowflake) -> Option<User> {
        self.users.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Rewrite every cached member's user record whose id matches
    ///
    /// Keeps member → user links consistent after `user_update` without
    /// refetching any guild. Returns how many members were rewired.
    pub fn propagate_user(&self, user: &User) -> usize {
        let mut rewired = 0;
        for mut entry in self.guilds.iter_mut() {
            if let Some(member) = entry.value_mut().members.get_mut(&user.id) {
                member.user = user.clone();
                rewired += 1;
            }
        }

        tracing::trace!(user_id = %user.id, rewired, "User propagated to cached members");

        rewired
    }

    // === Messages ===

    /// The recent-message ring buffer
    #[must_use]
    pub fn messages(&self) -> &MessageRing {
        &self.messages
    }
}
