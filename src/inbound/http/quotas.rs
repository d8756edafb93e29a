//! Administrative quota HTTP handlers.
//!
//! ```text
//! PUT /api/v1/group-quotas
//! PUT /api/v1/regional-quotas
//! ```

use actix_web::{put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{SetGroupQuotaRequest, SetRegionalQuotaRequest};
use crate::domain::{
    CategoryCode, Error, GroupQuota, HunterGroup, IdentityContext, QuotaKey, RegionalQuota,
    Species,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request payload for writing a group sub-allocation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetGroupQuotaBody {
    pub species: Species,
    #[schema(example = "M0")]
    pub category: CategoryCode,
    pub group: HunterGroup,
    pub total: u32,
}

/// Request payload for writing a regional quota line.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetRegionalQuotaBody {
    pub species: Species,
    #[schema(example = "M0")]
    pub category: CategoryCode,
    pub total: u32,
    /// Soft-deactivation flag; defaults to leaving the line active.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

fn quota_key(
    identity: &IdentityContext,
    species: Species,
    category: CategoryCode,
) -> Result<QuotaKey, Error> {
    Ok(QuotaKey {
        reserve: identity.require_reserve()?.clone(),
        species,
        category,
    })
}

/// Group quota response payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupQuotaBody {
    pub species: Species,
    pub category: CategoryCode,
    pub group: HunterGroup,
    pub total: u32,
    pub harvested: u32,
}

impl From<GroupQuota> for GroupQuotaBody {
    fn from(value: GroupQuota) -> Self {
        Self {
            species: value.key.species,
            category: value.key.category,
            group: value.group,
            total: value.total,
            harvested: value.harvested,
        }
    }
}

/// Regional quota response payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionalQuotaBody {
    pub species: Species,
    pub category: CategoryCode,
    pub total: u32,
    pub harvested: u32,
    pub active: bool,
}

impl From<RegionalQuota> for RegionalQuotaBody {
    fn from(value: RegionalQuota) -> Self {
        Self {
            species: value.key.species,
            category: value.key.category,
            total: value.total,
            harvested: value.harvested,
            active: value.active,
        }
    }
}

/// Create or resize a group sub-allocation.
#[utoipa::path(
    put,
    path = "/api/v1/group-quotas",
    request_body = SetGroupQuotaBody,
    responses(
        (status = 200, description = "Group quota written", body = GroupQuotaBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Administrative role required", body = Error),
        (status = 404, description = "No regional quota for the category", body = Error),
        (status = 422, description = "Write would break the quota hierarchy", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["quotas"],
    operation_id = "setGroupQuota"
)]
#[put("/group-quotas")]
pub async fn set_group_quota(
    state: web::Data<HttpState>,
    identity: IdentityContext,
    payload: web::Json<SetGroupQuotaBody>,
) -> ApiResult<web::Json<GroupQuotaBody>> {
    identity.require_admin()?;
    let body = payload.into_inner();
    let quota = state
        .quotas
        .set_group_quota(SetGroupQuotaRequest {
            key: quota_key(&identity, body.species, body.category)?,
            group: body.group,
            total: body.total,
        })
        .await?;

    Ok(web::Json(GroupQuotaBody::from(quota)))
}

/// Create or resize a regional quota line.
#[utoipa::path(
    put,
    path = "/api/v1/regional-quotas",
    request_body = SetRegionalQuotaBody,
    responses(
        (status = 200, description = "Regional quota written", body = RegionalQuotaBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Administrative role required", body = Error),
        (status = 422, description = "Write would break the quota hierarchy", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["quotas"],
    operation_id = "setRegionalQuota"
)]
#[put("/regional-quotas")]
pub async fn set_regional_quota(
    state: web::Data<HttpState>,
    identity: IdentityContext,
    payload: web::Json<SetRegionalQuotaBody>,
) -> ApiResult<web::Json<RegionalQuotaBody>> {
    identity.require_admin()?;
    let body = payload.into_inner();
    let quota = state
        .quotas
        .set_regional_quota(SetRegionalQuotaRequest {
            key: quota_key(&identity, body.species, body.category)?,
            total: body.total,
            active: body.active,
        })
        .await?;

    Ok(web::Json(RegionalQuotaBody::from(quota)))
}

#[cfg(test)]
#[path = "quotas_tests.rs"]
mod tests;
