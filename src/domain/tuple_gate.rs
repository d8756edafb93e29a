//! Per-key critical sections for ledger and claim mutation.
//!
//! Every mutation of a `(reserve, species, category)` line — claim
//! creation, harvest commit, harvest restore, administrative resize — must
//! run its "read remaining, decide, write" sequence without interleaving
//! against the same line. [`TupleGate`] hands out one async mutex per
//! [`QuotaKey`]; operations on distinct keys proceed in parallel.
//!
//! Gate entries are created on first use and kept for the life of the
//! process; the key space is bounded by the quota catalogue, so the map
//! does not grow unboundedly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use crate::domain::quota::QuotaKey;

/// Keyed async mutex serialising all mutation of one quota line.
#[derive(Debug, Default)]
pub struct TupleGate {
    entries: Mutex<HashMap<QuotaKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl TupleGate {
    /// Create an empty gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the critical section for `key`, waiting until any concurrent
    /// holder for the same key leaves it.
    pub async fn enter(&self, key: &QuotaKey) -> OwnedMutexGuard<()> {
        let entry = {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key.clone()).or_default())
        };
        entry.lock_owned().await
    }
}
