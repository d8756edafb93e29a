//! Driving port for harvest commit and restore.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::quota::{GameCategory, HunterGroup, ReserveId};
use crate::domain::report::HuntOutcome;

/// A hunt report as submitted against a completed reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReportRequest {
    pub reservation_id: Uuid,
    pub reserve: ReserveId,
    pub outcome: HuntOutcome,
    /// Harvested category; required iff `outcome == Harvest`.
    pub category: Option<GameCategory>,
    /// Group whose sub-quota the harvest counts against, for group-managed
    /// reserves.
    pub hunter_group: Option<HunterGroup>,
}

/// Result of filing a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReportResponse {
    pub report_id: Uuid,
}

/// Harvest commit/restore operations tying reports to quota counters.
#[async_trait]
pub trait HarvestLedger: Send + Sync {
    /// File a report; a harvest outcome increments the matching regional
    /// (and group) counters by one, rejected without partial effect when
    /// either counter would exceed its ceiling.
    async fn commit_harvest(
        &self,
        request: SubmitReportRequest,
    ) -> Result<SubmitReportResponse, Error>;

    /// Reverse the ledger effect of a previously committed report.
    /// Idempotent: a report already reversed (or one that never
    /// incremented) is left untouched.
    async fn restore_harvest(&self, report_id: Uuid) -> Result<(), Error>;
}
