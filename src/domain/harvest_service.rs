//! Harvest commit/restore: the protocol tying hunt reports to quota
//! counters.
//!
//! A harvest report permanently consumes one unit of regional (and, in
//! group-managed reserves, group) capacity. The increment pair is applied
//! inside the same per-key critical section that claims use, and the
//! report's [`QuotaEffect`] marker makes the reversal on deletion
//! idempotent.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::availability::map_ledger_error;
use crate::domain::error::Error;
use crate::domain::ports::{
    BookingGateway, BookingGatewayError, HarvestDelta, HarvestLedger, HuntReportStore,
    QuotaLedger, ReportStoreError, SubmitReportRequest, SubmitReportResponse,
};
use crate::domain::quota::{GroupQuota, QuotaKey, RegionalQuota};
use crate::domain::report::{HuntReport, QuotaEffect};
use crate::domain::tuple_gate::TupleGate;

fn map_report_store_error(error: ReportStoreError) -> Error {
    match error {
        ReportStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("report store unavailable: {message}"))
        }
        ReportStoreError::Query { message } => {
            Error::internal(format!("report store error: {message}"))
        }
    }
}

fn map_booking_error(error: BookingGatewayError) -> Error {
    match error {
        BookingGatewayError::Unavailable { message } => {
            Error::service_unavailable(format!("booking gateway unavailable: {message}"))
        }
    }
}

/// Harvest ledger service over the quota ledger, report store and booking
/// gateway.
#[derive(Clone)]
pub struct HarvestLedgerService<L, R, B> {
    ledger: Arc<L>,
    reports: Arc<R>,
    bookings: Arc<B>,
    gate: Arc<TupleGate>,
    clock: Arc<dyn Clock>,
}

impl<L, R, B> HarvestLedgerService<L, R, B> {
    /// Create the service; `gate` must be the same instance the lock
    /// lifecycle uses so ledger mutation stays serialised per key.
    pub fn new(
        ledger: Arc<L>,
        reports: Arc<R>,
        bookings: Arc<B>,
        gate: Arc<TupleGate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            reports,
            bookings,
            gate,
            clock,
        }
    }
}

fn check_ceiling(quota_total: u32, harvested: u32, scope: &str, key: &QuotaKey) -> Result<(), Error> {
    if harvested >= quota_total {
        return Err(Error::quota_exceeded(format!(
            "{scope} quota for {key} is exhausted ({harvested}/{quota_total})"
        ))
        .with_details(json!({
            "scope": scope,
            "harvested": harvested,
            "total": quota_total,
        })));
    }
    Ok(())
}

impl<L, R, B> HarvestLedgerService<L, R, B>
where
    L: QuotaLedger,
    R: HuntReportStore,
    B: BookingGateway,
{
    async fn load_regional(&self, key: &QuotaKey) -> Result<RegionalQuota, Error> {
        self.ledger
            .regional_quota(key)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found(format!("no regional quota configured for {key}")))
    }

    async fn load_group(
        &self,
        key: &QuotaKey,
        group: crate::domain::quota::HunterGroup,
    ) -> Result<GroupQuota, Error> {
        self.ledger
            .group_quota(key, group)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| {
                Error::not_found(format!("no group {group} quota configured for {key}"))
            })
    }
}

#[async_trait]
impl<L, R, B> HarvestLedger for HarvestLedgerService<L, R, B>
where
    L: QuotaLedger,
    R: HuntReportStore,
    B: BookingGateway,
{
    async fn commit_harvest(
        &self,
        request: SubmitReportRequest,
    ) -> Result<SubmitReportResponse, Error> {
        let report = HuntReport::file(
            request.reservation_id,
            request.reserve,
            request.outcome,
            request.category,
            request.hunter_group,
            self.clock.utc(),
        )
        .map_err(|err| Error::invalid_request(format!("invalid hunt report: {err}")))?;
        let report_id = report.id;

        match report.quota_key() {
            None => {
                // No-harvest outcome: the report closes the reservation but
                // the ledger is untouched.
                self.reports
                    .insert(report)
                    .await
                    .map_err(map_report_store_error)?;
            }
            Some(key) => {
                let _section = self.gate.enter(&key).await;

                // The ceiling may have been lowered since the lock was
                // granted; the commit-time check is the backstop.
                let regional = self.load_regional(&key).await?;
                check_ceiling(regional.total, regional.harvested, "regional", &key)?;
                if let Some(group) = report.hunter_group {
                    let group_quota = self.load_group(&key, group).await?;
                    check_ceiling(group_quota.total, group_quota.harvested, "group", &key)?;
                }

                self.reports
                    .insert(report.clone())
                    .await
                    .map_err(map_report_store_error)?;
                self.ledger
                    .apply_harvest(&key, report.hunter_group, HarvestDelta::Record)
                    .await
                    .map_err(map_ledger_error)?;
                self.reports
                    .set_effect(report_id, QuotaEffect::Committed)
                    .await
                    .map_err(map_report_store_error)?;

                info!(
                    report_id = %report_id,
                    key = %key,
                    harvested = regional.harvested + 1,
                    total = regional.total,
                    "harvest committed"
                );
            }
        }

        self.bookings
            .mark_completed(request.reservation_id)
            .await
            .map_err(map_booking_error)?;
        Ok(SubmitReportResponse { report_id })
    }

    async fn restore_harvest(&self, report_id: Uuid) -> Result<(), Error> {
        let Some(report) = self
            .reports
            .find(report_id)
            .await
            .map_err(map_report_store_error)?
        else {
            return Err(Error::not_found(format!("hunt report {report_id} not found")));
        };

        let Some(key) = report.quota_key() else {
            debug!(report_id = %report_id, "restore of a no-harvest report is a no-op");
            return Ok(());
        };

        let _section = self.gate.enter(&key).await;

        // Re-read under the gate so two concurrent deletions cannot both
        // observe `Committed`.
        let Some(current) = self
            .reports
            .find(report_id)
            .await
            .map_err(map_report_store_error)?
        else {
            return Err(Error::not_found(format!("hunt report {report_id} not found")));
        };
        if current.effect != QuotaEffect::Committed {
            debug!(
                report_id = %report_id,
                effect = ?current.effect,
                "restore skipped: report has no outstanding ledger effect"
            );
            return Ok(());
        }

        let regional = self.load_regional(&key).await?;
        if regional.harvested == 0 {
            // A committed report implies at least one recorded harvest;
            // tolerate the inconsistency rather than underflow.
            warn!(key = %key, "restore found harvested already at zero");
        } else {
            self.ledger
                .apply_harvest(&key, current.hunter_group, HarvestDelta::Restore)
                .await
                .map_err(map_ledger_error)?;
        }
        self.reports
            .set_effect(report_id, QuotaEffect::Reversed)
            .await
            .map_err(map_report_store_error)?;

        info!(report_id = %report_id, key = %key, "harvest restored");
        Ok(())
    }
}

#[cfg(test)]
#[path = "harvest_service_tests.rs"]
mod tests;
