//! Map-backed quota ledger.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{HarvestDelta, QuotaLedger, QuotaLedgerError};
use crate::domain::{GroupQuota, HunterGroup, QuotaKey, RegionalQuota};

#[derive(Default)]
struct Tables {
    regional: HashMap<QuotaKey, RegionalQuota>,
    groups: HashMap<(QuotaKey, HunterGroup), GroupQuota>,
}

/// In-memory [`QuotaLedger`] adapter.
#[derive(Default)]
pub struct InMemoryQuotaLedger {
    tables: RwLock<Tables>,
}

impl InMemoryQuotaLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl QuotaLedger for InMemoryQuotaLedger {
    async fn regional_quota(
        &self,
        key: &QuotaKey,
    ) -> Result<Option<RegionalQuota>, QuotaLedgerError> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.regional.get(key).cloned())
    }

    async fn group_quota(
        &self,
        key: &QuotaKey,
        group: HunterGroup,
    ) -> Result<Option<GroupQuota>, QuotaLedgerError> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.groups.get(&(key.clone(), group)).cloned())
    }

    async fn group_quotas(&self, key: &QuotaKey) -> Result<Vec<GroupQuota>, QuotaLedgerError> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mut quotas: Vec<GroupQuota> = tables
            .groups
            .values()
            .filter(|quota| &quota.key == key)
            .cloned()
            .collect();
        quotas.sort_by_key(|quota| quota.group);
        Ok(quotas)
    }

    async fn upsert_regional_quota(&self, quota: RegionalQuota) -> Result<(), QuotaLedgerError> {
        self.write().regional.insert(quota.key.clone(), quota);
        Ok(())
    }

    async fn upsert_group_quota(&self, quota: GroupQuota) -> Result<(), QuotaLedgerError> {
        self.write()
            .groups
            .insert((quota.key.clone(), quota.group), quota);
        Ok(())
    }

    async fn apply_harvest(
        &self,
        key: &QuotaKey,
        group: Option<HunterGroup>,
        delta: HarvestDelta,
    ) -> Result<(), QuotaLedgerError> {
        let mut tables = self.write();

        // Validate both lines before touching either so the pair moves as
        // one unit.
        if !tables.regional.contains_key(key) {
            return Err(QuotaLedgerError::missing_quota(format!(
                "no regional quota for {key}"
            )));
        }
        if let Some(group) = group
            && !tables.groups.contains_key(&(key.clone(), group))
        {
            return Err(QuotaLedgerError::missing_quota(format!(
                "no group {group} quota for {key}"
            )));
        }

        let apply = |harvested: &mut u32| match delta {
            HarvestDelta::Record => *harvested += 1,
            HarvestDelta::Restore => *harvested = harvested.saturating_sub(1),
        };
        if let Some(regional) = tables.regional.get_mut(key) {
            apply(&mut regional.harvested);
        }
        if let Some(group) = group
            && let Some(line) = tables.groups.get_mut(&(key.clone(), group))
        {
            apply(&mut line.harvested);
        }
        Ok(())
    }
}
