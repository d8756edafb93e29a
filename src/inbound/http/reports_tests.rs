//! Tests for the hunt report handlers.

use actix_web::http::{Method, StatusCode};
use actix_web::{App, test, web};
use serde_json::json;

use super::*;
use crate::domain::RegionalQuota;
use crate::domain::ports::QuotaLedger;
use crate::inbound::http::test_utils::{harness, hunter_request};
use crate::test_support::roe_deer_key;

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(submit_report)
            .service(delete_report),
    )
}

async fn seed_regional(
    harness: &crate::inbound::http::test_utils::TestHarness,
    total: u32,
    harvested: u32,
) {
    harness
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

fn harvest_body(reservation_id: Uuid) -> serde_json::Value {
    json!({
        "reservationId": reservation_id,
        "outcome": "harvest",
        "species": "roe_deer",
        "category": "M0",
    })
}

#[actix_web::test]
async fn filed_harvest_consumes_a_unit_and_completes_the_reservation() {
    let harness = harness();
    seed_regional(&harness, 5, 0).await;
    let app = test::init_service(test_app(harness.state.clone())).await;
    let reservation_id = Uuid::new_v4();

    let request = hunter_request()
        .method(Method::POST)
        .uri("/api/v1/hunt-reports")
        .set_json(harvest_body(reservation_id))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let regional = harness
        .ledger
        .regional_quota(&roe_deer_key("M0"))
        .await
        .expect("read regional")
        .expect("regional present");
    assert_eq!(regional.harvested, 1);
    assert_eq!(harness.bookings.completed(), vec![reservation_id]);
}

#[actix_web::test]
async fn harvest_at_the_ceiling_is_unprocessable() {
    let harness = harness();
    seed_regional(&harness, 2, 2).await;
    let app = test::init_service(test_app(harness.state.clone())).await;

    let request = hunter_request()
        .method(Method::POST)
        .uri("/api/v1/hunt-reports")
        .set_json(harvest_body(Uuid::new_v4()))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "quota_exceeded");
}

#[actix_web::test]
async fn species_without_category_is_a_bad_request() {
    let harness = harness();
    let app = test::init_service(test_app(harness.state.clone())).await;

    let request = hunter_request()
        .method(Method::POST)
        .uri("/api/v1/hunt-reports")
        .set_json(json!({
            "reservationId": Uuid::new_v4(),
            "outcome": "harvest",
            "species": "roe_deer",
        }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleting_a_report_restores_the_unit() {
    let harness = harness();
    seed_regional(&harness, 5, 0).await;
    let app = test::init_service(test_app(harness.state.clone())).await;

    let submit = hunter_request()
        .method(Method::POST)
        .uri("/api/v1/hunt-reports")
        .set_json(harvest_body(Uuid::new_v4()))
        .to_request();
    let filed: serde_json::Value = test::call_and_read_body_json(&app, submit).await;
    let report_id = filed["reportId"].as_str().expect("report id").to_owned();

    let delete = hunter_request()
        .method(Method::DELETE)
        .uri(&format!("/api/v1/hunt-reports/{report_id}"))
        .to_request();
    let response = test::call_service(&app, delete).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let regional = harness
        .ledger
        .regional_quota(&roe_deer_key("M0"))
        .await
        .expect("read regional")
        .expect("regional present");
    assert_eq!(regional.harvested, 0);
}

#[actix_web::test]
async fn deleting_an_unknown_report_is_not_found() {
    let harness = harness();
    let app = test::init_service(test_app(harness.state.clone())).await;

    let delete = hunter_request()
        .method(Method::DELETE)
        .uri(&format!("/api/v1/hunt-reports/{}", Uuid::new_v4()))
        .to_request();
    let response = test::call_service(&app, delete).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
