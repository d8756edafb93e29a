//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API. The generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{Availability, AvailabilityReason};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::locks::{
    AvailabilityBody, CheckAvailabilityBody, CleanupResponseBody, ConsumedLockBody,
    CreateLockBody, CreateLockResponseBody, LockTupleBody, ReleaseResponseBody, SessionBody,
};
use crate::inbound::http::quotas::{
    GroupQuotaBody, RegionalQuotaBody, SetGroupQuotaBody, SetRegionalQuotaBody,
};
use crate::inbound::http::reports::{SubmitReportBody, SubmitReportResponseBody};

/// Enrich the generated document with the gateway identity scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "GatewayIdentity",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-riserva-user",
                "Caller identity headers injected by the authentication gateway.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Riserva quota engine API",
        description = "Quota availability, reservation locking, and harvest accounting."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("GatewayIdentity" = [])),
    paths(
        crate::inbound::http::locks::check_availability,
        crate::inbound::http::locks::create_lock,
        crate::inbound::http::locks::release_lock,
        crate::inbound::http::locks::consume_lock,
        crate::inbound::http::locks::cleanup_expired,
        crate::inbound::http::reports::submit_report,
        crate::inbound::http::reports::delete_report,
        crate::inbound::http::quotas::set_group_quota,
        crate::inbound::http::quotas::set_regional_quota,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Availability,
        AvailabilityReason,
        LockTupleBody,
        CheckAvailabilityBody,
        AvailabilityBody,
        CreateLockBody,
        CreateLockResponseBody,
        SessionBody,
        ReleaseResponseBody,
        ConsumedLockBody,
        CleanupResponseBody,
        SubmitReportBody,
        SubmitReportResponseBody,
        SetGroupQuotaBody,
        SetRegionalQuotaBody,
        GroupQuotaBody,
        RegionalQuotaBody,
    )),
    tags(
        (name = "reservation-locks", description = "Availability checks and claim lifecycle"),
        (name = "hunt-reports", description = "Harvest commit and restore"),
        (name = "quotas", description = "Administrative quota writes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
