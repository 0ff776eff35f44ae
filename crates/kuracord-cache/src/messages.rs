//! Recent-message ring buffer
//!
//! Fixed-capacity FIFO used to recover previous message state for edit and
//! delete events. Capacity 0 disables caching entirely.

use kuracord_core::{Message, Snowflake};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Bounded buffer of recently seen messages, oldest evicted first
#[derive(Debug)]
pub struct MessageRing {
    capacity: usize,
    entries: Mutex<VecDeque<Message>>,
}

impl MessageRing {
    /// Create a ring with the given capacity; 0 disables caching
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
        }
    }

    /// Whether message caching is enabled
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Number of cached messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Insert a message, evicting the oldest entry past capacity
    ///
    /// A message already present (same id and channel) is replaced in place
    /// instead of being duplicated.
    pub fn insert(&self, message: Message) {
        if !self.is_enabled() {
            return;
        }

        let mut entries = self.entries.lock();
        if let Some(existing) = entries
            .iter_mut()
            .find(|m| m.id == message.id && m.channel_id() == message.channel_id())
        {
            *existing = message;
            return;
        }

        entries.push_back(message);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Look up a message by id and channel
    #[must_use]
    pub fn get(&self, id: Snowflake, channel_id: Snowflake) -> Option<Message> {
        self.entries
            .lock()
            .iter()
            .find(|m| m.id == id && m.channel_id() == channel_id)
            .cloned()
    }

    /// Remove and return a message by id and channel
    pub fn remove(&self, id: Snowflake, channel_id: Snowflake) -> Option<Message> {
        let mut entries = self.entries.lock();
        let index = entries
            .iter()
            .position(|m| m.id == id && m.channel_id() == channel_id)?;
        entries.remove(index)
    }

    /// Apply an edit to the cached copy of a message
    ///
    /// Returns the (before, after) pair when the message was cached, `None`
    /// when it was never seen or already evicted.
    pub fn apply_edit(&self, incoming: &Message) -> Option<(Message, Message)> {
        let mut entries = self.entries.lock();
        let cached = entries
            .iter_mut()
            .find(|m| m.id == incoming.id && m.channel_id() == incoming.channel_id())?;

        let before = cached.clone();
        cached.content = incoming.content.clone();
        cached.edited_at = incoming.edited_at;
        cached.attachments = incoming.attachments.clone();

        Some((before, cached.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: u64, channel_id: u64, content: &str) -> Message {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "content": content,
            "author": { "id": 1, "username": "velvet" },
            "guild": { "id": 7, "name": "g", "shortName": "g" },
            "channel": { "id": channel_id, "name": "general", "type": 0 }
        }))
        .unwrap()
    }

    #[test]
    fn test_capacity_bound_keeps_newest() {
        let ring = MessageRing::new(3);
        for i in 1..=5 {
            ring.insert(message(i, 42, "m"));
        }

        assert_eq!(ring.len(), 3);
        assert!(ring.get(Snowflake::new(1), Snowflake::new(42)).is_none());
        assert!(ring.get(Snowflake::new(2), Snowflake::new(42)).is_none());
        for i in 3..=5 {
            assert!(ring.get(Snowflake::new(i), Snowflake::new(42)).is_some());
        }
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let ring = MessageRing::new(0);
        ring.insert(message(1, 42, "m"));

        assert!(!ring.is_enabled());
        assert!(ring.is_empty());
    }

    #[test]
    fn test_duplicate_insert_replaces() {
        let ring = MessageRing::new(10);
        ring.insert(message(1, 42, "first"));
        ring.insert(message(1, 42, "second"));

        assert_eq!(ring.len(), 1);
        assert_eq!(
            ring.get(Snowflake::new(1), Snowflake::new(42)).unwrap().content,
            "second"
        );
    }

    #[test]
    fn test_same_id_different_channel_is_distinct() {
        let ring = MessageRing::new(10);
        ring.insert(message(1, 42, "a"));
        ring.insert(message(1, 43, "b"));

        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_apply_edit_returns_before_and_after() {
        let ring = MessageRing::new(10);
        ring.insert(message(1, 42, "original"));

        let mut incoming = message(1, 42, "edited");
        incoming.edited_at = Some(chrono::Utc::now());

        let (before, after) = ring.apply_edit(&incoming).unwrap();
        assert_eq!(before.content, "original");
        assert_eq!(after.content, "edited");
        assert!(after.is_edited());

        // the cached copy was mutated, not replaced
        assert_eq!(
            ring.get(Snowflake::new(1), Snowflake::new(42)).unwrap().content,
            "edited"
        );
    }

    #[test]
    fn test_apply_edit_on_uncached_message() {
        let ring = MessageRing::new(10);
        assert!(ring.apply_edit(&message(9, 42, "x")).is_none());
    }

    #[test]
    fn test_remove() {
        let ring = MessageRing::new(10);
        ring.insert(message(1, 42, "m"));

        assert!(ring.remove(Snowflake::new(1), Snowflake::new(42)).is_some());
        assert!(ring.remove(Snowflake::new(1), Snowflake::new(42)).is_none());
        assert!(ring.is_empty());
    }
}
