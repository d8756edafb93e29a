//! Driven port for the durable quota ledger.

use async_trait::async_trait;

use crate::domain::quota::{GroupQuota, HunterGroup, QuotaKey, RegionalQuota};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by quota ledger adapters.
    pub enum QuotaLedgerError {
        /// The backing store could not be reached.
        Unavailable { message: String } =>
            "quota ledger unavailable: {message}",
        /// A read or write failed during execution.
        Query { message: String } =>
            "quota ledger query failed: {message}",
        /// A harvest delta addressed a ledger line that does not exist.
        MissingQuota { message: String } =>
            "quota ledger line missing: {message}",
    }
}

/// Direction of a harvest counter adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestDelta {
    /// Record one confirmed harvest (`harvested += 1`).
    Record,
    /// Reverse one previously recorded harvest (`harvested -= 1`,
    /// saturating at zero).
    Restore,
}

/// Port for reading and mutating regional and group quota counters.
///
/// Adapters only move counters; bound and hierarchy checks belong to the
/// domain services, which call in from inside the per-key critical section.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuotaLedger: Send + Sync {
    /// Read the regional quota line for a key.
    async fn regional_quota(
        &self,
        key: &QuotaKey,
    ) -> Result<Option<RegionalQuota>, QuotaLedgerError>;

    /// Read one group's sub-quota for a key.
    async fn group_quota(
        &self,
        key: &QuotaKey,
        group: HunterGroup,
    ) -> Result<Option<GroupQuota>, QuotaLedgerError>;

    /// Read every group sub-quota configured for a key.
    async fn group_quotas(&self, key: &QuotaKey) -> Result<Vec<GroupQuota>, QuotaLedgerError>;

    /// Create or replace a regional quota line.
    async fn upsert_regional_quota(&self, quota: RegionalQuota) -> Result<(), QuotaLedgerError>;

    /// Create or replace a group sub-quota line.
    async fn upsert_group_quota(&self, quota: GroupQuota) -> Result<(), QuotaLedgerError>;

    /// Apply one harvest delta to the regional counter and, when `group`
    /// is present, the matching group counter, as a single unit.
    async fn apply_harvest(
        &self,
        key: &QuotaKey,
        group: Option<HunterGroup>,
        delta: HarvestDelta,
    ) -> Result<(), QuotaLedgerError>;
}
