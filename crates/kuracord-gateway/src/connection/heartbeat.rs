//! Heartbeat loop and zombie detection

use super::{Outbound, SessionState};
use crate::client::KuracordClient;
use crate::events::{Event, ZombiedEvent};
use crate::protocol::{close_codes, GatewayPayload};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Unacknowledged heartbeats tolerated before the connection is a zombie
const ZOMBIE_THRESHOLD: u32 = 5;

/// Owns the heartbeat cadence for one session
///
/// The loop sends a beat, sleeps for the interval the server requested in
/// HELLO, and repeats until cancelled. Send failures are not handled here;
/// the writer task surfaces them as socket errors and the loop simply ends
/// when the channel closes.
pub struct HeartbeatMonitor {
    client: KuracordClient,
    interval: Duration,
    outbound: mpsc::Sender<Outbound>,
    cancel: CancellationToken,
}

impl HeartbeatMonitor {
    #[must_use]
    pub fn new(
        client: KuracordClient,
        interval_ms: u64,
        outbound: mpsc::Sender<Outbound>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            interval: Duration::from_millis(interval_ms),
            outbound,
            cancel,
        }
    }

    /// Run the heartbeat loop until cancellation or a fatal zombie verdict
    pub async fn run(self) {
        tracing::debug!("Heartbeat task started");

        loop {
            if !self.beat().await {
                break;
            }

            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::debug!("Heartbeat task stopped");
    }

    /// One heartbeat cycle; returns false when the loop must stop
    ///
    /// The zombie policy runs before the send: a fatal verdict forces a
    /// reconnect without sending another beat first.
    pub(crate) async fn beat(&self) -> bool {
        let state: &SessionState = self.client.session_state();
        let skipped = state.skipped_heartbeats();
        let download_completed = state.guild_download_completed();

        if skipped > ZOMBIE_THRESHOLD {
            if download_completed {
                tracing::error!(
                    skipped,
                    "Server failed to acknowledge more than {ZOMBIE_THRESHOLD} heartbeats - connection is zombie"
                );

                self.client
                    .emit(Event::Zombied(ZombiedEvent { skipped, fatal: true }))
                    .await;
                self.client
                    .request_reconnect(
                        true,
                        close_codes::TOO_MANY_HEARTBEATS_MISSED,
                        "Too many heartbeats missed",
                    )
                    .await;

                return false;
            }

            // the initial sync is still running; assume a slow link rather
            // than a dead one
            tracing::warn!(
                skipped,
                "Server failed to acknowledge more than {ZOMBIE_THRESHOLD} heartbeats, but the guild download is still running - check your connection speed"
            );
            self.client
                .emit(Event::Zombied(ZombiedEvent { skipped, fatal: false }))
                .await;
        }

        tracing::trace!("Sending heartbeat");
        let payload = GatewayPayload::heartbeat(state.last_sequence());

        if self.outbound.send(Outbound::Payload(payload)).await.is_err() {
            // writer gone: the socket is closing
            return false;
        }

        state.record_heartbeat_sent();
        true
    }
}
