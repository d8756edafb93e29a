//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use actix_web::test::TestRequest;
use chrono::TimeDelta;
use mockable::Clock;

use crate::domain::{
    AvailabilityService, HarvestLedgerService, LockLifecycleService, QuotaAdminService, TupleGate,
};
use crate::inbound::http::identity::{GROUP_HEADER, RESERVE_HEADER, ROLE_HEADER, USER_HEADER};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    InMemoryBookingGateway, InMemoryLockStore, InMemoryQuotaLedger, InMemoryReportStore,
};
use crate::test_support::MutableClock;

/// In-memory-backed dependency bundle for handler tests.
pub struct TestHarness {
    pub ledger: Arc<InMemoryQuotaLedger>,
    pub locks: Arc<InMemoryLockStore>,
    pub reports: Arc<InMemoryReportStore>,
    pub bookings: Arc<InMemoryBookingGateway>,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

/// Wire the real services over in-memory adapters.
pub fn harness() -> TestHarness {
    let ledger = Arc::new(InMemoryQuotaLedger::new());
    let locks = Arc::new(InMemoryLockStore::new());
    let reports = Arc::new(InMemoryReportStore::new());
    let bookings = Arc::new(InMemoryBookingGateway::new());
    let clock = Arc::new(MutableClock::at_season_start());
    let gate = Arc::new(TupleGate::new());

    let availability = Arc::new(AvailabilityService::new(
        Arc::clone(&ledger),
        Arc::clone(&locks),
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    let lock_service = Arc::new(LockLifecycleService::new(
        Arc::clone(&availability),
        Arc::clone(&locks),
        Arc::clone(&gate),
        Arc::clone(&clock) as Arc<dyn Clock>,
        TimeDelta::minutes(10),
    ));
    let harvest = Arc::new(HarvestLedgerService::new(
        Arc::clone(&ledger),
        Arc::clone(&reports),
        Arc::clone(&bookings),
        Arc::clone(&gate),
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    let quotas = Arc::new(QuotaAdminService::new(Arc::clone(&ledger), gate));

    let state = HttpState {
        availability,
        locks: lock_service,
        harvest,
        quotas,
    };
    TestHarness {
        ledger,
        locks,
        reports,
        bookings,
        clock,
        state,
    }
}

/// A hunter request in the fixture reserve.
pub fn hunter_request() -> TestRequest {
    TestRequest::default()
        .insert_header((USER_HEADER, "3fa85f64-5717-4562-b3fc-2c963f66afa6"))
        .insert_header((ROLE_HEADER, "hunter"))
        .insert_header((RESERVE_HEADER, "val-grande"))
}

/// A hunter request carrying a group membership.
pub fn group_hunter_request(group: &str) -> TestRequest {
    hunter_request().insert_header((GROUP_HEADER, group))
}

/// An administrator request in the fixture reserve.
pub fn admin_request() -> TestRequest {
    TestRequest::default()
        .insert_header((USER_HEADER, "8c5f0e0a-2f43-4f7e-9d2a-54d2f0a4c6b1"))
        .insert_header((ROLE_HEADER, "admin"))
        .insert_header((RESERVE_HEADER, "val-grande"))
}
