//! Driven port for hunt report persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::report::{HuntReport, QuotaEffect};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by hunt report store adapters.
    pub enum ReportStoreError {
        /// The backing store could not be reached.
        Unavailable { message: String } =>
            "report store unavailable: {message}",
        /// A read or write failed during execution.
        Query { message: String } =>
            "report store query failed: {message}",
    }
}

/// Port for hunt report rows and their ledger-effect marker.
///
/// Reversed reports are retained rather than deleted so that a second
/// deletion of the same report stays a no-op on the ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HuntReportStore: Send + Sync {
    /// Persist a newly filed report.
    async fn insert(&self, report: HuntReport) -> Result<(), ReportStoreError>;

    /// Find a report by id.
    async fn find(&self, id: Uuid) -> Result<Option<HuntReport>, ReportStoreError>;

    /// Update the report's ledger-effect marker; returns `false` when the
    /// report does not exist.
    async fn set_effect(&self, id: Uuid, effect: QuotaEffect) -> Result<bool, ReportStoreError>;
}
