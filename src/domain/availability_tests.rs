//! Tests for the availability engine.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use uuid::Uuid;

use super::*;
use crate::domain::lock::{ReservationLock, ReservationLockDraft};
use crate::domain::ports::{MockLockStore, MockQuotaLedger, QuotaLedgerError};
use crate::domain::quota::{GroupQuota, RegionalQuota};
use crate::test_support::{MutableClock, morning_tuple, roe_deer_key};

fn regional(total: u32, harvested: u32) -> RegionalQuota {
    RegionalQuota {
        key: roe_deer_key("M0"),
        total,
        harvested,
        active: true,
    }
}

fn group(group: HunterGroup, total: u32, harvested: u32) -> GroupQuota {
    GroupQuota {
        key: roe_deer_key("M0"),
        group,
        total,
        harvested,
    }
}

fn session(name: &str) -> SessionId {
    SessionId::new(name).expect("valid session id")
}

fn active_lock(
    clock: &MutableClock,
    session_name: &str,
    hunter_group: Option<HunterGroup>,
) -> ReservationLock {
    ReservationLock::create(
        ReservationLockDraft {
            user_id: Uuid::new_v4(),
            tuple: morning_tuple("M0"),
            hunter_group,
            session_id: session(session_name),
        },
        clock.utc(),
        TimeDelta::minutes(10),
    )
}

struct Fixture {
    ledger: MockQuotaLedger,
    locks: MockLockStore,
    clock: Arc<MutableClock>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            ledger: MockQuotaLedger::new(),
            locks: MockLockStore::new(),
            clock: Arc::new(MutableClock::at_season_start()),
        }
    }

    fn with_regional(mut self, quota: RegionalQuota) -> Self {
        self.ledger
            .expect_regional_quota()
            .returning(move |_| Ok(Some(quota.clone())));
        self
    }

    fn with_group(mut self, quota: GroupQuota) -> Self {
        self.ledger
            .expect_group_quota()
            .returning(move |_, _| Ok(Some(quota.clone())));
        self
    }

    fn with_active_locks(mut self, locks: Vec<ReservationLock>) -> Self {
        self.locks
            .expect_active_locks()
            .returning(move |_| Ok(locks.clone()));
        self
    }

    fn service(mut self) -> AvailabilityService<MockQuotaLedger, MockLockStore> {
        self.locks
            .expect_expire_stale_for_tuple()
            .returning(|_, _| Ok(0));
        AvailabilityService::new(Arc::new(self.ledger), Arc::new(self.locks), self.clock)
    }

    fn clock(&self) -> Arc<MutableClock> {
        Arc::clone(&self.clock)
    }
}

fn request(session_name: &str, hunter_group: Option<HunterGroup>) -> CheckAvailabilityRequest {
    CheckAvailabilityRequest {
        tuple: morning_tuple("M0"),
        session_id: session(session_name),
        hunter_group,
    }
}

#[tokio::test]
async fn regional_remaining_subtracts_harvests_and_competing_locks() {
    let fixture = Fixture::new().with_regional(regional(10, 4));
    let clock = fixture.clock();
    let locks = vec![
        active_lock(&clock, "other-1", None),
        active_lock(&clock, "other-2", None),
    ];
    let service = fixture.with_active_locks(locks).service();

    let availability = service
        .check_availability(request("mine", None))
        .await
        .expect("check succeeds");

    assert!(availability.available);
    assert_eq!(availability.remaining, 4);
    assert_eq!(availability.reason, None);
}

#[tokio::test]
async fn own_session_lock_does_not_shrink_own_availability() {
    let fixture = Fixture::new().with_regional(regional(1, 0));
    let clock = fixture.clock();
    let service = fixture
        .with_active_locks(vec![active_lock(&clock, "mine", None)])
        .service();

    let availability = service
        .check_availability(request("mine", None))
        .await
        .expect("check succeeds");

    assert!(availability.available);
    assert_eq!(availability.remaining, 1);
}

#[tokio::test]
async fn competing_lock_on_the_last_unit_reports_exhausted() {
    let fixture = Fixture::new().with_regional(regional(1, 0));
    let clock = fixture.clock();
    let service = fixture
        .with_active_locks(vec![active_lock(&clock, "other", None)])
        .service();

    let availability = service
        .check_availability(request("mine", None))
        .await
        .expect("check succeeds");

    assert!(!availability.available);
    assert_eq!(availability.remaining, 0);
    assert_eq!(
        availability.reason,
        Some(AvailabilityReason::RegionalExhausted)
    );
}

#[tokio::test]
async fn expired_lock_no_longer_consumes_capacity() {
    let fixture = Fixture::new().with_regional(regional(1, 0));
    let clock = fixture.clock();
    let stale = active_lock(&clock, "other", None);
    clock.advance(Duration::from_secs(11 * 60));
    let service = fixture.with_active_locks(vec![stale]).service();

    let availability = service
        .check_availability(request("mine", None))
        .await
        .expect("check succeeds");

    assert!(availability.available);
    assert_eq!(availability.remaining, 1);
}

#[tokio::test]
async fn binding_result_is_the_minimum_of_regional_and_group() {
    let service = Fixture::new()
        .with_regional(regional(10, 2))
        .with_group(group(HunterGroup::A, 3, 1))
        .with_active_locks(Vec::new())
        .service();

    let availability = service
        .check_availability(request("mine", Some(HunterGroup::A)))
        .await
        .expect("check succeeds");

    assert!(availability.available);
    assert_eq!(availability.remaining, 2);
}

#[tokio::test]
async fn group_locks_count_only_against_their_own_group() {
    let fixture = Fixture::new()
        .with_regional(regional(10, 0))
        .with_group(group(HunterGroup::A, 2, 0));
    let clock = fixture.clock();
    let locks = vec![
        active_lock(&clock, "other-a", Some(HunterGroup::A)),
        active_lock(&clock, "other-b", Some(HunterGroup::B)),
    ];
    let service = fixture.with_active_locks(locks).service();

    let availability = service
        .check_availability(request("mine", Some(HunterGroup::A)))
        .await
        .expect("check succeeds");

    // Group A: 2 total − 1 own-group lock = 1; regional: 10 − 2 locks = 8.
    assert!(availability.available);
    assert_eq!(availability.remaining, 1);
}

#[tokio::test]
async fn exhausted_group_blocks_even_with_regional_capacity() {
    let service = Fixture::new()
        .with_regional(regional(8, 0))
        .with_group(group(HunterGroup::A, 2, 2))
        .with_active_locks(Vec::new())
        .service();

    let availability = service
        .check_availability(request("mine", Some(HunterGroup::A)))
        .await
        .expect("check succeeds");

    assert!(!availability.available);
    assert_eq!(availability.reason, Some(AvailabilityReason::GroupExhausted));
}

#[tokio::test]
async fn exhausted_regional_blocks_even_with_group_capacity() {
    let service = Fixture::new()
        .with_regional(regional(2, 2))
        .with_group(group(HunterGroup::A, 2, 0))
        .with_active_locks(Vec::new())
        .service();

    let availability = service
        .check_availability(request("mine", Some(HunterGroup::A)))
        .await
        .expect("check succeeds");

    assert!(!availability.available);
    assert_eq!(
        availability.reason,
        Some(AvailabilityReason::RegionalExhausted)
    );
}

#[tokio::test]
async fn unconfigured_quota_reports_unavailable_not_an_error() {
    let mut fixture = Fixture::new();
    fixture
        .ledger
        .expect_regional_quota()
        .returning(|_| Ok(None));
    let service = fixture.service();

    let availability = service
        .check_availability(request("mine", None))
        .await
        .expect("check succeeds");

    assert!(!availability.available);
    assert_eq!(
        availability.reason,
        Some(AvailabilityReason::QuotaNotConfigured)
    );
}

#[tokio::test]
async fn deactivated_quota_reports_unavailable() {
    let mut quota = regional(5, 0);
    quota.active = false;
    let service = Fixture::new().with_regional(quota).service();

    let availability = service
        .check_availability(request("mine", None))
        .await
        .expect("check succeeds");

    assert!(!availability.available);
    assert_eq!(availability.reason, Some(AvailabilityReason::QuotaInactive));
}

#[tokio::test]
async fn missing_group_allocation_reports_unavailable() {
    let mut fixture = Fixture::new().with_regional(regional(5, 0));
    fixture
        .ledger
        .expect_group_quota()
        .returning(|_, _| Ok(None));
    let service = fixture.with_active_locks(Vec::new()).service();

    let availability = service
        .check_availability(request("mine", Some(HunterGroup::C)))
        .await
        .expect("check succeeds");

    assert!(!availability.available);
    assert_eq!(
        availability.reason,
        Some(AvailabilityReason::GroupNotAllocated)
    );
}

#[tokio::test]
async fn ledger_outage_maps_to_service_unavailable() {
    let mut fixture = Fixture::new();
    fixture
        .ledger
        .expect_regional_quota()
        .returning(|_| Err(QuotaLedgerError::unavailable("pool exhausted")));
    let service = fixture.service();

    let error = service
        .check_availability(request("mine", None))
        .await
        .expect_err("outage surfaces");

    assert_eq!(error.code(), crate::domain::ErrorCode::ServiceUnavailable);
}
