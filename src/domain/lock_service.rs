//! Lock lifecycle manager.
//!
//! Creates, releases, consumes, and sweeps reservation locks. Claim
//! creation re-runs the availability arithmetic inside the per-key
//! critical section that also inserts the lock, so two concurrent callers
//! observing `remaining = 1` can never both claim the last unit.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::availability::{AvailabilityService, map_lock_store_error};
use crate::domain::error::Error;
use crate::domain::lock::{LockStatus, ReservationLock, ReservationLockDraft, SessionId};
use crate::domain::ports::{
    CreateLockRequest, CreateLockResponse, LockLifecycle, LockStore, QuotaLedger,
};
use crate::domain::tuple_gate::TupleGate;

/// Lock lifecycle service over the lock store, sharing the availability
/// engine and the critical-section gate with the harvest path.
#[derive(Clone)]
pub struct LockLifecycleService<L, S> {
    availability: Arc<AvailabilityService<L, S>>,
    locks: Arc<S>,
    gate: Arc<TupleGate>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl<L, S> LockLifecycleService<L, S> {
    /// Create the service.
    pub fn new(
        availability: Arc<AvailabilityService<L, S>>,
        locks: Arc<S>,
        gate: Arc<TupleGate>,
        clock: Arc<dyn Clock>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            availability,
            locks,
            gate,
            clock,
            ttl,
        }
    }
}

#[async_trait]
impl<L, S> LockLifecycle for LockLifecycleService<L, S>
where
    L: QuotaLedger,
    S: LockStore,
{
    async fn create_lock(&self, request: CreateLockRequest) -> Result<CreateLockResponse, Error> {
        let key = request.tuple.quota_key();
        let _section = self.gate.enter(&key).await;
        let now = self.clock.utc();

        self.locks
            .expire_stale_for_tuple(&request.tuple, now)
            .await
            .map_err(map_lock_store_error)?;

        if let Some(existing) = self
            .locks
            .find_active_by_session(&request.session_id)
            .await
            .map_err(map_lock_store_error)?
        {
            if !existing.is_expired_at(now) && existing.tuple == request.tuple {
                // Same flow asking again: hand back the claim it already holds.
                debug!(lock_id = %existing.id, session = %request.session_id, "re-claim of held tuple");
                return Ok(CreateLockResponse {
                    lock_id: existing.id,
                    expires_at: existing.expires_at,
                });
            }
            // One flow per session: an abandoned or redirected claim frees
            // its unit before the new tuple is evaluated.
            let to = if existing.is_expired_at(now) {
                LockStatus::Expired
            } else {
                LockStatus::Released
            };
            self.locks
                .transition_active(&request.session_id, to)
                .await
                .map_err(map_lock_store_error)?;
        }

        let availability = self
            .availability
            .evaluate(&request.tuple, &request.session_id, request.hunter_group)
            .await?;
        if !availability.available {
            return Err(Error::conflict(format!(
                "no remaining capacity for {}",
                request.tuple
            ))
            .with_details(json!({
                "remaining": availability.remaining,
                "reason": availability.reason,
            })));
        }

        let lock = ReservationLock::create(
            ReservationLockDraft {
                user_id: request.user_id,
                tuple: request.tuple,
                hunter_group: request.hunter_group,
                session_id: request.session_id,
            },
            now,
            self.ttl,
        );
        self.locks
            .insert(lock.clone())
            .await
            .map_err(map_lock_store_error)?;

        info!(
            lock_id = %lock.id,
            tuple = %lock.tuple,
            expires_at = %lock.expires_at,
            "reservation lock created"
        );
        Ok(CreateLockResponse {
            lock_id: lock.id,
            expires_at: lock.expires_at,
        })
    }

    async fn release_lock(&self, session: &SessionId) -> Result<bool, Error> {
        let now = self.clock.utc();
        let Some(existing) = self
            .locks
            .find_active_by_session(session)
            .await
            .map_err(map_lock_store_error)?
        else {
            debug!(session = %session, "release with no active lock is a no-op");
            return Ok(false);
        };

        // A timed-out claim takes the same terminal state the sweep would
        // give it; either way the capacity is already free.
        let to = if existing.is_expired_at(now) {
            LockStatus::Expired
        } else {
            LockStatus::Released
        };
        let released = self
            .locks
            .transition_active(session, to)
            .await
            .map_err(map_lock_store_error)?;
        if let Some(lock) = &released {
            info!(lock_id = %lock.id, status = %lock.status, "reservation lock released");
        }
        Ok(released.is_some_and(|lock| lock.status == LockStatus::Released))
    }

    async fn consume_lock(&self, session: &SessionId) -> Result<ReservationLock, Error> {
        let now = self.clock.utc();
        let Some(existing) = self
            .locks
            .find_active_by_session(session)
            .await
            .map_err(map_lock_store_error)?
        else {
            return Err(Error::invalid_state(
                "no active selection for this session; restart the claim flow",
            ));
        };

        if existing.is_expired_at(now) {
            self.locks
                .transition_active(session, LockStatus::Expired)
                .await
                .map_err(map_lock_store_error)?;
            return Err(Error::invalid_state(
                "the selection expired; restart the claim flow",
            ));
        }

        let consumed = self
            .locks
            .transition_active(session, LockStatus::Consumed)
            .await
            .map_err(map_lock_store_error)?
            // The sweep may have beaten us to the transition.
            .ok_or_else(|| {
                Error::invalid_state("the selection expired; restart the claim flow")
            })?;

        info!(lock_id = %consumed.id, tuple = %consumed.tuple, "reservation lock consumed");
        Ok(consumed)
    }

    async fn cleanup_expired_locks(&self) -> Result<u64, Error> {
        let swept = self
            .locks
            .expire_stale(self.clock.utc())
            .await
            .map_err(map_lock_store_error)?;
        if swept > 0 {
            info!(swept, "expired reservation locks swept");
        }
        Ok(swept)
    }
}

#[cfg(test)]
#[path = "lock_service_tests.rs"]
mod tests;
