//! End-to-end scenarios over the wired services and in-memory adapters.

use std::sync::Arc;

use chrono::TimeDelta;
use futures::future::join_all;
use mockable::Clock;
use uuid::Uuid;

use riserva_backend::domain::ports::{
    AvailabilityQuery, CheckAvailabilityRequest, CreateLockRequest, HarvestLedger, LockLifecycle,
    QuotaAdministration, QuotaLedger, SetGroupQuotaRequest, SetRegionalQuotaRequest,
    SubmitReportRequest,
};
use riserva_backend::domain::{
    AvailabilityService, ErrorCode, GroupQuota, HarvestLedgerService, HuntOutcome, HunterGroup,
    LockLifecycleService, QuotaAdminService, RegionalQuota, SessionId, TupleGate,
};
use riserva_backend::outbound::memory::{
    InMemoryBookingGateway, InMemoryLockStore, InMemoryQuotaLedger, InMemoryReportStore,
};
use riserva_backend::test_support::{MutableClock, morning_tuple, reserve, roe_deer_key};

struct Engine {
    ledger: Arc<InMemoryQuotaLedger>,
    clock: Arc<MutableClock>,
    availability: Arc<AvailabilityService<InMemoryQuotaLedger, InMemoryLockStore>>,
    locks: Arc<LockLifecycleService<InMemoryQuotaLedger, InMemoryLockStore>>,
    harvest:
        Arc<HarvestLedgerService<InMemoryQuotaLedger, InMemoryReportStore, InMemoryBookingGateway>>,
    admin: Arc<QuotaAdminService<InMemoryQuotaLedger>>,
}

fn engine() -> Engine {
    let ledger = Arc::new(InMemoryQuotaLedger::new());
    let lock_store = Arc::new(InMemoryLockStore::new());
    let reports = Arc::new(InMemoryReportStore::new());
    let bookings = Arc::new(InMemoryBookingGateway::new());
    let clock = Arc::new(MutableClock::at_season_start());
    let gate = Arc::new(TupleGate::new());

    let availability = Arc::new(AvailabilityService::new(
        Arc::clone(&ledger),
        Arc::clone(&lock_store),
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    let locks = Arc::new(LockLifecycleService::new(
        Arc::clone(&availability),
        Arc::clone(&lock_store),
        Arc::clone(&gate),
        Arc::clone(&clock) as Arc<dyn Clock>,
        TimeDelta::minutes(10),
    ));
    let harvest = Arc::new(HarvestLedgerService::new(
        Arc::clone(&ledger),
        reports,
        bookings,
        Arc::clone(&gate),
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    let admin = Arc::new(QuotaAdminService::new(Arc::clone(&ledger), gate));

    Engine {
        ledger,
        clock,
        availability,
        locks,
        harvest,
        admin,
    }
}

async fn seed_regional(engine: &Engine, total: u32, harvested: u32) {
    engine
        .ledger
        .upsert_regional_quota(RegionalQuota {
            key: roe_deer_key("M0"),
            total,
            harvested,
            active: true,
        })
        .await
        .expect("seed regional quota");
}

fn session(name: &str) -> SessionId {
    SessionId::new(name).expect("valid session id")
}

fn claim(session_name: &str) -> CreateLockRequest {
    CreateLockRequest {
        user_id: Uuid::new_v4(),
        tuple: morning_tuple("M0"),
        session_id: session(session_name),
        hunter_group: None,
    }
}

fn harvest_request() -> SubmitReportRequest {
    let key = roe_deer_key("M0");
    SubmitReportRequest {
        reservation_id: Uuid::new_v4(),
        reserve: reserve(),
        outcome: HuntOutcome::Harvest,
        category: Some(key.game_category()),
        hunter_group: None,
    }
}

#[tokio::test]
async fn concurrent_claims_on_the_last_unit_grant_exactly_one() {
    let engine = engine();
    seed_regional(&engine, 1, 0).await;

    let (first, second) = futures::join!(
        engine.locks.create_lock(claim("sess-a")),
        engine.locks.create_lock(claim("sess-b")),
    );

    let granted = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(granted, 1);
    let loser = [first, second]
        .into_iter()
        .find_map(Result::err)
        .expect("one claim lost the race");
    assert_eq!(loser.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn a_burst_of_claims_never_overbooks_the_remaining_capacity() {
    let engine = engine();
    seed_regional(&engine, 5, 2).await;

    let attempts = (0..16).map(|i| {
        let locks = Arc::clone(&engine.locks);
        async move { locks.create_lock(claim(&format!("sess-{i}"))).await }
    });
    let results = join_all(attempts).await;

    let granted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(granted, 3);
    assert!(
        results
            .into_iter()
            .filter_map(Result::err)
            .all(|error| error.code() == ErrorCode::Conflict)
    );
}

#[tokio::test]
async fn an_abandoned_lock_stops_counting_after_its_ttl() {
    let engine = engine();
    seed_regional(&engine, 4, 1).await;
    engine
        .locks
        .create_lock(claim("abandoned"))
        .await
        .expect("claim granted");

    let before = engine
        .availability
        .check_availability(CheckAvailabilityRequest {
            tuple: morning_tuple("M0"),
            session_id: session("observer"),
            hunter_group: None,
        })
        .await
        .expect("check succeeds");
    assert_eq!(before.remaining, 2);

    engine.clock.advance_minutes(11);

    let after = engine
        .availability
        .check_availability(CheckAvailabilityRequest {
            tuple: morning_tuple("M0"),
            session_id: session("observer"),
            hunter_group: None,
        })
        .await
        .expect("check succeeds");
    assert_eq!(after.remaining, 3);
}

#[tokio::test]
async fn a_lock_still_counts_at_the_final_second_of_its_ttl() {
    let engine = engine();
    seed_regional(&engine, 1, 0).await;
    engine
        .locks
        .create_lock(claim("holder"))
        .await
        .expect("claim granted");

    engine.clock.advance_minutes(9);
    let held = engine
        .availability
        .check_availability(CheckAvailabilityRequest {
            tuple: morning_tuple("M0"),
            session_id: session("observer"),
            hunter_group: None,
        })
        .await
        .expect("check succeeds");
    assert_eq!(held.remaining, 0);

    engine.clock.advance_minutes(1);
    let freed = engine
        .availability
        .check_availability(CheckAvailabilityRequest {
            tuple: morning_tuple("M0"),
            session_id: session("observer"),
            hunter_group: None,
        })
        .await
        .expect("check succeeds");
    assert_eq!(freed.remaining, 1);
}

#[tokio::test]
async fn raising_a_group_past_the_regional_ceiling_is_rejected() {
    let engine = engine();
    engine
        .admin
        .set_regional_quota(SetRegionalQuotaRequest {
            key: roe_deer_key("M0"),
            total: 8,
            active: true,
        })
        .await
        .expect("regional write accepted");
    for (group, total) in [(HunterGroup::A, 5), (HunterGroup::B, 3)] {
        engine
            .admin
            .set_group_quota(SetGroupQuotaRequest {
                key: roe_deer_key("M0"),
                group,
                total,
            })
            .await
            .expect("group write accepted");
    }

    let error = engine
        .admin
        .set_group_quota(SetGroupQuotaRequest {
            key: roe_deer_key("M0"),
            group: HunterGroup::A,
            total: 6,
        })
        .await
        .expect_err("hierarchy enforced");

    assert_eq!(error.code(), ErrorCode::InvariantViolation);
}

#[tokio::test]
async fn commit_against_an_exhausted_quota_leaves_the_ledger_unchanged() {
    let engine = engine();
    seed_regional(&engine, 2, 2).await;

    let error = engine
        .harvest
        .commit_harvest(harvest_request())
        .await
        .expect_err("ceiling enforced");

    assert_eq!(error.code(), ErrorCode::QuotaExceeded);
    let regional = engine
        .ledger
        .regional_quota(&roe_deer_key("M0"))
        .await
        .expect("read regional")
        .expect("regional present");
    assert_eq!(regional.harvested, 2);
}

#[tokio::test]
async fn deleting_a_committed_report_restores_the_unit_exactly_once() {
    let engine = engine();
    seed_regional(&engine, 5, 2).await;

    let filed = engine
        .harvest
        .commit_harvest(harvest_request())
        .await
        .expect("commit succeeds");
    let after_commit = engine
        .ledger
        .regional_quota(&roe_deer_key("M0"))
        .await
        .expect("read regional")
        .expect("regional present");
    assert_eq!(after_commit.harvested, 3);

    engine
        .harvest
        .restore_harvest(filed.report_id)
        .await
        .expect("restore succeeds");
    engine
        .harvest
        .restore_harvest(filed.report_id)
        .await
        .expect("second restore is a no-op");

    let after_restore = engine
        .ledger
        .regional_quota(&roe_deer_key("M0"))
        .await
        .expect("read regional")
        .expect("regional present");
    assert_eq!(after_restore.harvested, 2);
}

#[tokio::test]
async fn group_ledgers_bind_claims_even_with_regional_headroom() {
    let engine = engine();
    seed_regional(&engine, 10, 0).await;
    engine
        .ledger
        .upsert_group_quota(GroupQuota {
            key: roe_deer_key("M0"),
            group: HunterGroup::A,
            total: 1,
            harvested: 0,
        })
        .await
        .expect("seed group quota");

    let mut first = claim("member-1");
    first.hunter_group = Some(HunterGroup::A);
    engine
        .locks
        .create_lock(first)
        .await
        .expect("first group claim granted");

    let mut second = claim("member-2");
    second.hunter_group = Some(HunterGroup::A);
    let error = engine
        .locks
        .create_lock(second)
        .await
        .expect_err("group capacity exhausted");
    assert_eq!(error.code(), ErrorCode::Conflict);

    // A caller outside the group still sees regional headroom.
    engine
        .locks
        .create_lock(claim("outsider"))
        .await
        .expect("ungrouped claim granted");
}
