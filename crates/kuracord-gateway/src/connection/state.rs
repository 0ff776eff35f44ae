//! Per-session gateway state
//!
//! Counters shared between the receive path and the heartbeat task. They
//! are written from both, so everything here is atomic or behind a short
//! lock.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::time::Instant;

/// Mutable state of the current gateway session
#[derive(Debug)]
pub struct SessionState {
    /// Session id assigned by READY
    session_id: RwLock<Option<String>>,

    /// Last sequence number observed on any payload; -1 until one is seen
    last_sequence: AtomicI64,

    /// Heartbeats sent without an acknowledgement
    skipped_heartbeats: AtomicU32,

    /// When the most recent heartbeat went out
    last_heartbeat_sent: Mutex<Option<Instant>>,

    /// Most recent heartbeat round-trip time in milliseconds
    ping_ms: AtomicI64,

    /// Whether the initial guild sync has finished
    guild_download_completed: AtomicBool,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_id: RwLock::new(None),
            last_sequence: AtomicI64::new(-1),
            skipped_heartbeats: AtomicU32::new(0),
            last_heartbeat_sent: Mutex::new(None),
            ping_ms: AtomicI64::new(0),
            guild_download_completed: AtomicBool::new(false),
        }
    }

    // === Session id ===

    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    pub fn set_session_id(&self, session_id: Option<String>) {
        *self.session_id.write() = session_id;
    }

    // === Sequence tracking ===

    /// Record the sequence number of a received payload, if it carried one
    ///
    /// Sequence numbers ride on any opcode, not just Dispatch; the value
    /// recorded here is what the next heartbeat echoes.
    pub fn observe_sequence(&self, sequence: Option<u64>) {
        if let Some(sequence) = sequence {
            self.last_sequence
                .store(i64::try_from(sequence).unwrap_or(i64::MAX), Ordering::SeqCst);
        }
    }

    /// The last observed sequence number, if any payload carried one yet
    #[must_use]
    pub fn last_sequence(&self) -> Option<u64> {
        let value = self.last_sequence.load(Ordering::SeqCst);
        u64::try_from(value).ok()
    }

    // === Heartbeats ===

    /// Record that a heartbeat was sent
    pub fn record_heartbeat_sent(&self) {
        *self.last_heartbeat_sent.lock() = Some(Instant::now());
        self.skipped_heartbeats.fetch_add(1, Ordering::SeqCst);
    }

    /// Record an acknowledgement and return the round-trip time in
    /// milliseconds
    ///
    /// The skipped counter saturates at zero: a spurious ack (or one racing
    /// a reconnect) must not drive it negative and mask later misses.
    pub fn record_heartbeat_ack(&self) -> i64 {
        let _ = self
            .skipped_heartbeats
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| Some(v.saturating_sub(1)));

        let ping = self
            .last_heartbeat_sent
            .lock()
            .map_or(0, |sent| i64::try_from(sent.elapsed().as_millis()).unwrap_or(i64::MAX));

        self.ping_ms.store(ping, Ordering::SeqCst);
        ping
    }

    #[must_use]
    pub fn skipped_heartbeats(&self) -> u32 {
        self.skipped_heartbeats.load(Ordering::SeqCst)
    }

    /// Most recent heartbeat round-trip time in milliseconds
    #[must_use]
    pub fn ping_ms(&self) -> i64 {
        self.ping_ms.load(Ordering::SeqCst)
    }

    // === Guild download ===

    /// Mark the guild download as completed
    ///
    /// Returns whether it was already marked, so the completion event fires
    /// exactly once per session.
    pub fn mark_guild_download_completed(&self) -> bool {
        self.guild_download_completed.swap(true, Ordering::SeqCst)
    }

    #[must_use]
    pub fn guild_download_completed(&self) -> bool {
        self.guild_download_completed.load(Ordering::SeqCst)
    }

    // === Lifecycle ===

    /// Reset the heartbeat counter for a fresh connection attempt
    pub fn reset_skipped_heartbeats(&self) {
        self.skipped_heartbeats.store(0, Ordering::SeqCst);
    }

    /// Wipe everything for a brand new (non-resumed) session
    pub fn reset_for_new_session(&self) {
        self.set_session_id(None);
        self.last_sequence.store(-1, Ordering::SeqCst);
        self.skipped_heartbeats.store(0, Ordering::SeqCst);
        *self.last_heartbeat_sent.lock() = None;
        self.ping_ms.store(0, Ordering::SeqCst);
        self.guild_download_completed.store(false, Ordering::SeqCst);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
