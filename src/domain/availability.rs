//! Availability engine: the single source of truth for "can this tuple be
//! claimed now".
//!
//! `remaining = ceiling − harvested − competing active claims`, computed
//! against the regional ledger and, for group-managed callers, against
//! their group's sub-ledger; the binding result is the minimum of the two.
//! The caller's own prior claim for the same session never counts against
//! them, so refreshing a check does not shrink their own availability.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::error::Error;
use crate::domain::lock::{LockTuple, ReservationLock, SessionId};
use crate::domain::ports::{
    Availability, AvailabilityQuery, AvailabilityReason, CheckAvailabilityRequest, LockStore,
    LockStoreError, QuotaLedger, QuotaLedgerError,
};
use crate::domain::quota::HunterGroup;

pub(crate) fn map_ledger_error(error: QuotaLedgerError) -> Error {
    match error {
        QuotaLedgerError::Unavailable { message } => {
            Error::service_unavailable(format!("quota ledger unavailable: {message}"))
        }
        QuotaLedgerError::Query { message } => {
            Error::internal(format!("quota ledger error: {message}"))
        }
        QuotaLedgerError::MissingQuota { message } => {
            Error::not_found(format!("quota line missing: {message}"))
        }
    }
}

pub(crate) fn map_lock_store_error(error: LockStoreError) -> Error {
    match error {
        LockStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("lock store unavailable: {message}"))
        }
        LockStoreError::Query { message } => Error::internal(format!("lock store error: {message}")),
    }
}

/// Availability engine over the quota ledger and lock store.
#[derive(Clone)]
pub struct AvailabilityService<L, S> {
    ledger: Arc<L>,
    locks: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<L, S> AvailabilityService<L, S> {
    /// Create the engine with its ledger, lock store and clock.
    pub fn new(ledger: Arc<L>, locks: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger,
            locks,
            clock,
        }
    }
}

fn count_competing(
    locks: &[ReservationLock],
    now: chrono::DateTime<chrono::Utc>,
    session: &SessionId,
    group: Option<HunterGroup>,
) -> u32 {
    let count = locks
        .iter()
        .filter(|lock| lock.consumes_capacity_at(now))
        .filter(|lock| lock.session_id != *session)
        .filter(|lock| group.is_none_or(|g| lock.hunter_group == Some(g)))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

impl<L, S> AvailabilityService<L, S>
where
    L: QuotaLedger,
    S: LockStore,
{
    /// Core arithmetic shared with the lock lifecycle, which re-runs it
    /// inside the claim critical section.
    pub(crate) async fn evaluate(
        &self,
        tuple: &LockTuple,
        session: &SessionId,
        hunter_group: Option<HunterGroup>,
    ) -> Result<Availability, Error> {
        let key = tuple.quota_key();
        let Some(regional) = self
            .ledger
            .regional_quota(&key)
            .await
            .map_err(map_ledger_error)?
        else {
            return Ok(Availability::unavailable(
                AvailabilityReason::QuotaNotConfigured,
            ));
        };
        if !regional.active {
            return Ok(Availability::unavailable(AvailabilityReason::QuotaInactive));
        }

        let locks = self
            .locks
            .active_locks(tuple)
            .await
            .map_err(map_lock_store_error)?;
        let now = self.clock.utc();

        let regional_remaining = regional
            .remaining()
            .saturating_sub(count_competing(&locks, now, session, None));

        let (remaining, reason) = if let Some(group) = hunter_group {
            let Some(group_quota) = self
                .ledger
                .group_quota(&key, group)
                .await
                .map_err(map_ledger_error)?
            else {
                return Ok(Availability::unavailable(
                    AvailabilityReason::GroupNotAllocated,
                ));
            };
            let group_remaining = group_quota
                .remaining()
                .saturating_sub(count_competing(&locks, now, session, Some(group)));
            // Zero on either ledger blocks the claim even when the other
            // ceiling is unmet.
            if regional_remaining == 0 {
                (0, Some(AvailabilityReason::RegionalExhausted))
            } else if group_remaining == 0 {
                (0, Some(AvailabilityReason::GroupExhausted))
            } else {
                (regional_remaining.min(group_remaining), None)
            }
        } else if regional_remaining == 0 {
            (0, Some(AvailabilityReason::RegionalExhausted))
        } else {
            (regional_remaining, None)
        };

        debug!(
            tuple = %tuple,
            session = %session,
            remaining,
            "availability evaluated"
        );
        Ok(Availability::with_remaining(remaining, reason))
    }
}

#[async_trait]
impl<L, S> AvailabilityQuery for AvailabilityService<L, S>
where
    L: QuotaLedger,
    S: LockStore,
{
    async fn check_availability(
        &self,
        request: CheckAvailabilityRequest,
    ) -> Result<Availability, Error> {
        // Opportunistic sweep keeps the count accurate without relying on
        // the background sweeper having run recently.
        self.locks
            .expire_stale_for_tuple(&request.tuple, self.clock.utc())
            .await
            .map_err(map_lock_store_error)?;

        self.evaluate(&request.tuple, &request.session_id, request.hunter_group)
            .await
    }
}

#[cfg(test)]
#[path = "availability_tests.rs"]
mod tests;
