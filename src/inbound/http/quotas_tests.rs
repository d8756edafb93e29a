//! Tests for the administrative quota handlers.

use actix_web::http::{Method, StatusCode};
use actix_web::{App, test, web};
use serde_json::json;

use super::*;
use crate::inbound::http::test_utils::{admin_request, harness, hunter_request};

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
            .service(set_group_quota)
            .service(set_regional_quota),
    )
}

fn regional_body(total: u32) -> serde_json::Value {
    json!({
        "species": "roe_deer",
        "category": "M0",
        "total": total,
    })
}

fn group_body(group: &str, total: u32) -> serde_json::Value {
    json!({
        "species": "roe_deer",
        "category": "M0",
        "group": group,
        "total": total,
    })
}

#[actix_web::test]
async fn admin_can_write_regional_then_group_quotas() {
    let harness = harness();
    let app = test::init_service(test_app(harness.state.clone())).await;

    let regional = admin_request()
        .method(Method::PUT)
        .uri("/api/v1/regional-quotas")
        .set_json(regional_body(8))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, regional).await;
    assert_eq!(body["total"], 8);
    assert_eq!(body["active"], true);

    let group = admin_request()
        .method(Method::PUT)
        .uri("/api/v1/group-quotas")
        .set_json(group_body("A", 5))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, group).await;
    assert_eq!(body["group"], "A");
    assert_eq!(body["total"], 5);
}

#[actix_web::test]
async fn group_write_breaking_the_hierarchy_is_unprocessable() {
    let harness = harness();
    let app = test::init_service(test_app(harness.state.clone())).await;

    for (uri, payload) in [
        ("/api/v1/regional-quotas", regional_body(8)),
        ("/api/v1/group-quotas", group_body("A", 5)),
        ("/api/v1/group-quotas", group_body("B", 3)),
    ] {
        let request = admin_request()
            .method(Method::PUT)
            .uri(uri)
            .set_json(payload)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Raising A from 5 to 6 would take the group sum to 9 > 8.
    let request = admin_request()
        .method(Method::PUT)
        .uri("/api/v1/group-quotas")
        .set_json(group_body("A", 6))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invariant_violation");
    assert_eq!(body["details"]["allowed"], 5);
}

#[actix_web::test]
async fn group_write_without_a_regional_line_is_not_found() {
    let harness = harness();
    let app = test::init_service(test_app(harness.state.clone())).await;

    let request = admin_request()
        .method(Method::PUT)
        .uri("/api/v1/group-quotas")
        .set_json(group_body("A", 2))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn hunters_cannot_write_quotas() {
    let harness = harness();
    let app = test::init_service(test_app(harness.state.clone())).await;

    let request = hunter_request()
        .method(Method::PUT)
        .uri("/api/v1/regional-quotas")
        .set_json(regional_body(8))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
