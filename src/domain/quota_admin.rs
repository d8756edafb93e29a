//! Administrative quota writes.
//!
//! The hierarchy invariant — group totals for a category may never sum
//! past the regional ceiling — lives here in the write path itself, not in
//! any form handler, so it holds regardless of which surface performs the
//! edit.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::availability::map_ledger_error;
use crate::domain::error::Error;
use crate::domain::ports::{
    QuotaAdministration, QuotaLedger, SetGroupQuotaRequest, SetRegionalQuotaRequest,
};
use crate::domain::quota::{GroupQuota, RegionalQuota};
use crate::domain::tuple_gate::TupleGate;

/// Administrative ledger write service.
#[derive(Clone)]
pub struct QuotaAdminService<L> {
    ledger: Arc<L>,
    gate: Arc<TupleGate>,
}

impl<L> QuotaAdminService<L> {
    /// Create the service; `gate` must be shared with the claim and
    /// harvest paths.
    pub fn new(ledger: Arc<L>, gate: Arc<TupleGate>) -> Self {
        Self { ledger, gate }
    }
}

#[async_trait]
impl<L> QuotaAdministration for QuotaAdminService<L>
where
    L: QuotaLedger,
{
    async fn set_group_quota(&self, request: SetGroupQuotaRequest) -> Result<GroupQuota, Error> {
        let _section = self.gate.enter(&request.key).await;

        let regional = self
            .ledger
            .regional_quota(&request.key)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| {
                Error::not_found(format!(
                    "no regional quota configured for {}; configure it before allocating groups",
                    request.key
                ))
            })?;

        let siblings = self
            .ledger
            .group_quotas(&request.key)
            .await
            .map_err(map_ledger_error)?;
        let sibling_total: u32 = siblings
            .iter()
            .filter(|quota| quota.group != request.group)
            .map(|quota| quota.total)
            .sum();

        let combined = sibling_total.saturating_add(request.total);
        if combined > regional.total {
            let allowed = regional.total.saturating_sub(sibling_total);
            return Err(Error::invariant_violation(format!(
                "group totals for {} would reach {combined}, exceeding the regional ceiling {}",
                request.key, regional.total
            ))
            .with_details(json!({
                "attempted": request.total,
                "allowed": allowed,
                "siblingTotal": sibling_total,
                "regionalTotal": regional.total,
            })));
        }

        let harvested = siblings
            .iter()
            .find(|quota| quota.group == request.group)
            .map_or(0, |quota| quota.harvested);
        if request.total < harvested {
            return Err(Error::invariant_violation(format!(
                "group {} for {} already recorded {harvested} harvests; total cannot drop below that",
                request.group, request.key
            ))
            .with_details(json!({
                "attempted": request.total,
                "harvested": harvested,
            })));
        }

        let quota = GroupQuota {
            key: request.key,
            group: request.group,
            total: request.total,
            harvested,
        };
        self.ledger
            .upsert_group_quota(quota.clone())
            .await
            .map_err(map_ledger_error)?;

        info!(
            key = %quota.key,
            group = %quota.group,
            total = quota.total,
            "group quota written"
        );
        Ok(quota)
    }

    async fn set_regional_quota(
        &self,
        request: SetRegionalQuotaRequest,
    ) -> Result<RegionalQuota, Error> {
        let _section = self.gate.enter(&request.key).await;

        let existing = self
            .ledger
            .regional_quota(&request.key)
            .await
            .map_err(map_ledger_error)?;
        let harvested = existing.as_ref().map_or(0, |quota| quota.harvested);
        if request.total < harvested {
            return Err(Error::invariant_violation(format!(
                "{} already recorded {harvested} harvests; ceiling cannot drop below that",
                request.key
            ))
            .with_details(json!({
                "attempted": request.total,
                "harvested": harvested,
            })));
        }

        let group_total: u32 = self
            .ledger
            .group_quotas(&request.key)
            .await
            .map_err(map_ledger_error)?
            .iter()
            .map(|quota| quota.total)
            .sum();
        if request.total < group_total {
            return Err(Error::invariant_violation(format!(
                "groups already allocate {group_total} units of {}; shrink them before the ceiling",
                request.key
            ))
            .with_details(json!({
                "attempted": request.total,
                "groupTotal": group_total,
            })));
        }

        let quota = RegionalQuota {
            key: request.key,
            total: request.total,
            harvested,
            active: request.active,
        };
        self.ledger
            .upsert_regional_quota(quota.clone())
            .await
            .map_err(map_ledger_error)?;

        info!(
            key = %quota.key,
            total = quota.total,
            active = quota.active,
            "regional quota written"
        );
        Ok(quota)
    }
}

#[cfg(test)]
#[path = "quota_admin_tests.rs"]
mod tests;
