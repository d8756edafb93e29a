//! Hunt report HTTP handlers.
//!
//! ```text
//! POST   /api/v1/hunt-reports
//! DELETE /api/v1/hunt-reports/{id}
//! ```

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{SubmitReportRequest, SubmitReportResponse};
use crate::domain::{
    CategoryCode, Error, GameCategory, HuntOutcome, IdentityContext, Species,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload for filing a hunt report.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportBody {
    #[schema(format = "uuid")]
    pub reservation_id: Uuid,
    pub outcome: HuntOutcome,
    /// Harvested species; required iff `outcome == harvest`.
    pub species: Option<Species>,
    /// Harvested category; required iff `outcome == harvest`.
    #[schema(example = "M0")]
    pub category: Option<CategoryCode>,
}

impl SubmitReportBody {
    fn harvested_category(&self) -> Result<Option<GameCategory>, Error> {
        match (self.species, self.category.clone()) {
            (Some(species), Some(category)) => Ok(Some(GameCategory { species, category })),
            (None, None) => Ok(None),
            _ => Err(Error::invalid_request(
                "species and category must be supplied together",
            )),
        }
    }
}

/// Response payload for a filed report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponseBody {
    #[schema(format = "uuid")]
    pub report_id: Uuid,
}

impl From<SubmitReportResponse> for SubmitReportResponseBody {
    fn from(value: SubmitReportResponse) -> Self {
        Self {
            report_id: value.report_id,
        }
    }
}

/// File a hunt report; a harvest outcome consumes one unit of quota.
#[utoipa::path(
    post,
    path = "/api/v1/hunt-reports",
    request_body = SubmitReportBody,
    responses(
        (status = 200, description = "Report filed", body = SubmitReportResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "No quota configured for the category", body = Error),
        (status = 422, description = "Quota ceiling already reached", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["hunt-reports"],
    operation_id = "submitHuntReport"
)]
#[post("/hunt-reports")]
pub async fn submit_report(
    state: web::Data<HttpState>,
    identity: IdentityContext,
    payload: web::Json<SubmitReportBody>,
) -> ApiResult<web::Json<SubmitReportResponseBody>> {
    let body = payload.into_inner();
    let category = body.harvested_category()?;
    let response = state
        .harvest
        .commit_harvest(SubmitReportRequest {
            reservation_id: body.reservation_id,
            reserve: identity.require_reserve()?.clone(),
            outcome: body.outcome,
            category,
            hunter_group: identity.hunter_group,
        })
        .await?;

    Ok(web::Json(SubmitReportResponseBody::from(response)))
}

/// Delete a hunt report, restoring the quota unit it consumed.
#[utoipa::path(
    delete,
    path = "/api/v1/hunt-reports/{id}",
    params(("id" = Uuid, Path, description = "Report identifier")),
    responses(
        (status = 204, description = "Report effect reversed"),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 404, description = "Report not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["hunt-reports"],
    operation_id = "deleteHuntReport"
)]
#[delete("/hunt-reports/{id}")]
pub async fn delete_report(
    state: web::Data<HttpState>,
    _identity: IdentityContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.harvest.restore_harvest(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;
