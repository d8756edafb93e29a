//! Server construction and wiring.

mod config;
mod sweeper;

pub use config::ServerSettings;
pub use sweeper::spawn_sweeper;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{
    AvailabilityService, HarvestLedgerService, LockLifecycleService, QuotaAdminService, TupleGate,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::locks::{
    check_availability, cleanup_expired, consume_lock, create_lock, release_lock,
};
use crate::inbound::http::quotas::{set_group_quota, set_regional_quota};
use crate::inbound::http::reports::{delete_report, submit_report};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    InMemoryBookingGateway, InMemoryLockStore, InMemoryQuotaLedger, InMemoryReportStore,
};

/// Wire the domain services over the in-memory adapters.
///
/// Everything that mutates a quota key shares one [`TupleGate`] so the
/// read-decide-write sequences in the claim, harvest and admin paths
/// serialise per key.
#[must_use]
pub fn build_http_state(settings: &ServerSettings) -> HttpState {
    let ledger = Arc::new(InMemoryQuotaLedger::new());
    let locks = Arc::new(InMemoryLockStore::new());
    let reports = Arc::new(InMemoryReportStore::new());
    let bookings = Arc::new(InMemoryBookingGateway::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let gate = Arc::new(TupleGate::new());

    let availability = Arc::new(AvailabilityService::new(
        Arc::clone(&ledger),
        Arc::clone(&locks),
        Arc::clone(&clock),
    ));
    let lifecycle = Arc::new(LockLifecycleService::new(
        Arc::clone(&availability),
        Arc::clone(&locks),
        Arc::clone(&gate),
        Arc::clone(&clock),
        settings.lock_ttl(),
    ));
    let harvest = Arc::new(HarvestLedgerService::new(
        Arc::clone(&ledger),
        reports,
        bookings,
        Arc::clone(&gate),
        Arc::clone(&clock),
    ));
    let quotas = Arc::new(QuotaAdminService::new(ledger, gate));

    HttpState {
        availability,
        locks: lifecycle,
        harvest,
        quotas,
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(check_availability)
        .service(create_lock)
        .service(release_lock)
        .service(consume_lock)
        .service(cleanup_expired)
        .service(submit_report)
        .service(delete_report)
        .service(set_group_quota)
        .service(set_regional_quota);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(web::scope("/health").service(live).service(ready));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the Actix HTTP server and start the background sweeper.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &ServerSettings,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(settings));
    spawn_sweeper(Arc::clone(&http_state.locks), settings.sweep_interval());

    let bind_addr = settings
        .bind_addr()
        .map_err(|error| std::io::Error::other(format!("invalid bind address: {error}")))?;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
