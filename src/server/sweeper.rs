//! Background expiry sweeper.
//!
//! Expired locks are already ignored by every read path; the sweep only
//! moves their records to the terminal `expired` state so the store does
//! not accumulate stale `active` rows.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::domain::ports::LockLifecycle;

/// Run the global expiry sweep on a fixed cadence.
pub fn spawn_sweeper(locks: Arc<dyn LockLifecycle>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(error) = locks.cleanup_expired_locks().await {
                // The lazy per-tuple sweep keeps counts correct meanwhile.
                warn!(error = %error, "expiry sweep failed");
            }
        }
    })
}
