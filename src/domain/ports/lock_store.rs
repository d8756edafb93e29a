//! Driven port for the ephemeral reservation lock store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::lock::{LockStatus, LockTuple, ReservationLock, SessionId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by lock store adapters.
    pub enum LockStoreError {
        /// The backing store could not be reached.
        Unavailable { message: String } =>
            "lock store unavailable: {message}",
        /// A read or write failed during execution.
        Query { message: String } =>
            "lock store query failed: {message}",
    }
}

/// Port for claim records.
///
/// `transition_active` and the expiry sweeps are compare-and-set moves out
/// of `Active` only; they can free capacity but never create it, which is
/// what makes them safe to run without the per-key critical section.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Persist a freshly created lock.
    async fn insert(&self, lock: ReservationLock) -> Result<(), LockStoreError>;

    /// Find the session's `Active` lock, if one exists.
    async fn find_active_by_session(
        &self,
        session: &SessionId,
    ) -> Result<Option<ReservationLock>, LockStoreError>;

    /// All `Active` locks for a tuple, including ones past expiry that have
    /// not been swept yet; callers filter by wall clock.
    async fn active_locks(&self, tuple: &LockTuple)
    -> Result<Vec<ReservationLock>, LockStoreError>;

    /// Move the session's `Active` lock to a terminal state, returning the
    /// updated record, or `None` when no `Active` lock exists.
    async fn transition_active(
        &self,
        session: &SessionId,
        to: LockStatus,
    ) -> Result<Option<ReservationLock>, LockStoreError>;

    /// Flip `Active` locks for one tuple whose TTL elapsed at `now` to
    /// `Expired`; returns how many were flipped.
    async fn expire_stale_for_tuple(
        &self,
        tuple: &LockTuple,
        now: DateTime<Utc>,
    ) -> Result<u64, LockStoreError>;

    /// Flip every stale `Active` lock to `Expired`; returns how many were
    /// flipped.
    async fn expire_stale(&self, now: DateTime<Utc>) -> Result<u64, LockStoreError>;
}
