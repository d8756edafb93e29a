//! Domain ports.
//!
//! Driving ports ([`AvailabilityQuery`], [`LockLifecycle`],
//! [`HarvestLedger`], [`QuotaAdministration`]) are implemented by the
//! domain services and consumed by inbound adapters through `Arc<dyn _>`.
//! Driven ports ([`QuotaLedger`], [`LockStore`], [`HuntReportStore`],
//! [`BookingGateway`]) are implemented by outbound adapters.

pub(crate) mod macros;

mod availability_query;
mod booking_gateway;
mod harvest_ledger;
mod lock_lifecycle;
mod lock_store;
mod quota_administration;
mod quota_ledger;
mod report_store;

pub use availability_query::{
    Availability, AvailabilityQuery, AvailabilityReason, CheckAvailabilityRequest,
};
pub use booking_gateway::{BookingGateway, BookingGatewayError};
pub use harvest_ledger::{HarvestLedger, SubmitReportRequest, SubmitReportResponse};
pub use lock_lifecycle::{CreateLockRequest, CreateLockResponse, LockLifecycle};
pub use lock_store::{LockStore, LockStoreError};
pub use quota_administration::{
    QuotaAdministration, SetGroupQuotaRequest, SetRegionalQuotaRequest,
};
pub use quota_ledger::{HarvestDelta, QuotaLedger, QuotaLedgerError};
pub use report_store::{HuntReportStore, ReportStoreError};

#[cfg(test)]
pub use booking_gateway::MockBookingGateway;
#[cfg(test)]
pub use lock_store::MockLockStore;
#[cfg(test)]
pub use quota_ledger::MockQuotaLedger;
#[cfg(test)]
pub use report_store::MockHuntReportStore;
