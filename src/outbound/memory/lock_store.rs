//! Map-backed reservation lock store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{LockStatus, LockTuple, ReservationLock, SessionId};
use crate::domain::ports::{LockStore, LockStoreError};

/// In-memory [`LockStore`] adapter.
#[derive(Default)]
pub struct InMemoryLockStore {
    locks: RwLock<HashMap<Uuid, ReservationLock>>,
}

impl InMemoryLockStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, ReservationLock>> {
        self.locks.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch any lock by id, whatever its status. Test observability only.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<ReservationLock> {
        self.locks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn insert(&self, lock: ReservationLock) -> Result<(), LockStoreError> {
        self.write().insert(lock.id, lock);
        Ok(())
    }

    async fn find_active_by_session(
        &self,
        session: &SessionId,
    ) -> Result<Option<ReservationLock>, LockStoreError> {
        let locks = self.locks.read().unwrap_or_else(PoisonError::into_inner);
        Ok(locks
            .values()
            .find(|lock| lock.status == LockStatus::Active && &lock.session_id == session)
            .cloned())
    }

    async fn active_locks(
        &self,
        tuple: &LockTuple,
    ) -> Result<Vec<ReservationLock>, LockStoreError> {
        let locks = self.locks.read().unwrap_or_else(PoisonError::into_inner);
        Ok(locks
            .values()
            .filter(|lock| lock.status == LockStatus::Active && &lock.tuple == tuple)
            .cloned()
            .collect())
    }

    async fn transition_active(
        &self,
        session: &SessionId,
        to: LockStatus,
    ) -> Result<Option<ReservationLock>, LockStoreError> {
        let mut locks = self.write();
        let Some(lock) = locks
            .values_mut()
            .find(|lock| lock.status == LockStatus::Active && &lock.session_id == session)
        else {
            return Ok(None);
        };
        lock.status = to;
        Ok(Some(lock.clone()))
    }

    async fn expire_stale_for_tuple(
        &self,
        tuple: &LockTuple,
        now: DateTime<Utc>,
    ) -> Result<u64, LockStoreError> {
        let mut locks = self.write();
        let mut flipped = 0;
        for lock in locks.values_mut() {
            if lock.status == LockStatus::Active && &lock.tuple == tuple && lock.is_expired_at(now)
            {
                lock.status = LockStatus::Expired;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn expire_stale(&self, now: DateTime<Utc>) -> Result<u64, LockStoreError> {
        let mut locks = self.write();
        let mut flipped = 0;
        for lock in locks.values_mut() {
            if lock.status == LockStatus::Active && lock.is_expired_at(now) {
                lock.status = LockStatus::Expired;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}
