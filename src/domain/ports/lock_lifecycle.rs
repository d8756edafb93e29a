//! Driving port for the reservation lock lifecycle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::lock::{LockTuple, ReservationLock, SessionId};
use crate::domain::quota::HunterGroup;

/// Inputs for a binding claim attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLockRequest {
    pub user_id: Uuid,
    pub tuple: LockTuple,
    pub session_id: SessionId,
    pub hunter_group: Option<HunterGroup>,
}

/// Result of a successful claim: enough for the client to render a
/// countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateLockResponse {
    pub lock_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Lock lifecycle operations.
///
/// State machine: `active -> {consumed | released | expired}`, all
/// terminal. Claim creation re-validates availability inside the same
/// per-key critical section that inserts the lock.
#[async_trait]
pub trait LockLifecycle: Send + Sync {
    /// Attempt a binding claim; fails with [`crate::domain::ErrorCode::Conflict`]
    /// when no capacity remains.
    async fn create_lock(&self, request: CreateLockRequest) -> Result<CreateLockResponse, Error>;

    /// Release the session's active lock. Idempotent: returns `false`
    /// (without error) when there was nothing to release.
    async fn release_lock(&self, session: &SessionId) -> Result<bool, Error>;

    /// Turn the session's active lock into a durable claim, returning the
    /// consumed lock. Fails with [`crate::domain::ErrorCode::InvalidState`]
    /// when the lock is absent, expired, or already terminal.
    async fn consume_lock(&self, session: &SessionId) -> Result<ReservationLock, Error>;

    /// Sweep every stale active lock to `expired`; returns the count swept.
    async fn cleanup_expired_locks(&self) -> Result<u64, Error>;
}
