//! Per-identity connection gate
//!
//! At most one session handshake may be in flight per client identity. The
//! gate is a semaphore with a cancellable delayed-release timer: a
//! successful HELLO schedules the release a few seconds out (by which time
//! IDENTIFY has been accepted or rejected), and a safety timer releases a
//! crashed handshake so future connects never deadlock.
//!
//! Gates live in a process-wide registry keyed by identity. Entries are
//! created on first use and never torn down; the registry is bounded by the
//! process lifetime and the number of distinct identities in it.

use dashmap::DashMap;
use kuracord_core::Snowflake;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

static GATES: OnceLock<DashMap<Snowflake, Arc<ConnectionGate>>> = OnceLock::new();

/// Get or create the gate for an identity
///
/// Independent client instances sharing a process only contend when they
/// share an identity.
pub fn gate_for(identity: Snowflake) -> Arc<ConnectionGate> {
    GATES
        .get_or_init(DashMap::new)
        .entry(identity)
        .or_insert_with(|| Arc::new(ConnectionGate::new(identity)))
        .value()
        .clone()
}

/// Bounds concurrent session establishment for one identity
#[derive(Debug)]
pub struct ConnectionGate {
    identity: Snowflake,
    permits: Arc<Semaphore>,
    max_concurrency: usize,
    /// Guards against double release: set on acquire, cleared exactly once
    locked: Arc<AtomicBool>,
    /// Invalidates stale delayed-release tasks from a previous hold
    epoch: Arc<AtomicU64>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionGate {
    /// How long a held gate survives before the safety release fires
    pub const SAFETY_RELEASE: Duration = Duration::from_secs(30);

    /// Release delay scheduled once HELLO arrives
    pub const POST_HELLO_RELEASE: Duration = Duration::from_secs(5);

    fn new(identity: Snowflake) -> Self {
        Self {
            identity,
            permits: Arc::new(Semaphore::new(1)),
            max_concurrency: 1,
            locked: Arc::new(AtomicBool::new(false)),
            epoch: Arc::new(AtomicU64::new(0)),
            timer: Mutex::new(None),
        }
    }

    /// Block until the gate is free, then hold it
    ///
    /// A safety timer releases the hold after [`Self::SAFETY_RELEASE`] in
    /// case the handshake never reaches HELLO.
    pub async fn acquire(&self) {
        match self.permits.clone().acquire_owned().await {
            Ok(permit) => permit.forget(),
            // the semaphore is never closed
            Err(_) => return,
        }

        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.locked.store(true, Ordering::SeqCst);

        tracing::trace!(identity = %self.identity, "Connection gate acquired");

        self.schedule_release(Self::SAFETY_RELEASE);
    }

    /// Schedule the release of a held gate after `delay`
    ///
    /// A no-op when the gate is already free. Supersedes any release timer
    /// already pending.
    pub fn release_after(&self, delay: Duration) {
        if !self.locked.load(Ordering::SeqCst) {
            return;
        }

        self.schedule_release(delay);
    }

    /// Release a held gate as soon as possible; no-op when already free
    pub fn release_now(&self) {
        self.release_after(Duration::ZERO);
    }

    fn schedule_release(&self, delay: Duration) {
        if let Some(previous) = self.timer.lock().take() {
            previous.abort();
        }

        let permits = Arc::clone(&self.permits);
        let locked = Arc::clone(&self.locked);
        let epoch = Arc::clone(&self.epoch);
        let expected = epoch.load(Ordering::SeqCst);
        let max_concurrency = self.max_concurrency;
        let identity = self.identity;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // a newer hold owns the gate now; this release is stale
            if epoch.load(Ordering::SeqCst) != expected {
                return;
            }

            if locked.swap(false, Ordering::SeqCst) {
                permits.add_permits(max_concurrency);
                tracing::trace!(identity = %identity, "Connection gate released");
            }
        });

        *self.timer.lock() = Some(handle);
    }
}
