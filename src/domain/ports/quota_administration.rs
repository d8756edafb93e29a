//! Driving port for administrative quota edits.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::quota::{GroupQuota, HunterGroup, QuotaKey, RegionalQuota};

/// Administrative write to one group's sub-allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetGroupQuotaRequest {
    pub key: QuotaKey,
    pub group: HunterGroup,
    pub total: u32,
}

/// Administrative write to a regional quota line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRegionalQuotaRequest {
    pub key: QuotaKey,
    pub total: u32,
    /// Soft-deactivation flag; `false` withdraws the line from availability
    /// without touching its counters.
    pub active: bool,
}

/// Administrative ledger writes with the hierarchy invariant enforced in
/// the write path itself, regardless of caller.
#[async_trait]
pub trait QuotaAdministration: Send + Sync {
    /// Create or resize a group sub-allocation. Fails with
    /// [`crate::domain::ErrorCode::InvariantViolation`] when the new group
    /// totals would exceed the regional ceiling or undercut harvests
    /// already recorded.
    async fn set_group_quota(&self, request: SetGroupQuotaRequest) -> Result<GroupQuota, Error>;

    /// Create or resize a regional quota line, subject to the same
    /// invariants from the other direction.
    async fn set_regional_quota(
        &self,
        request: SetRegionalQuotaRequest,
    ) -> Result<RegionalQuota, Error>;
}
