//! Map-backed hunt report store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{HuntReportStore, ReportStoreError};
use crate::domain::{HuntReport, QuotaEffect};

/// In-memory [`HuntReportStore`] adapter.
#[derive(Default)]
pub struct InMemoryReportStore {
    reports: RwLock<HashMap<Uuid, HuntReport>>,
}

impl InMemoryReportStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HuntReportStore for InMemoryReportStore {
    async fn insert(&self, report: HuntReport) -> Result<(), ReportStoreError> {
        self.reports
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(report.id, report);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<HuntReport>, ReportStoreError> {
        Ok(self
            .reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned())
    }

    async fn set_effect(&self, id: Uuid, effect: QuotaEffect) -> Result<bool, ReportStoreError> {
        let mut reports = self.reports.write().unwrap_or_else(PoisonError::into_inner);
        match reports.get_mut(&id) {
            Some(report) => {
                report.effect = effect;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
