//! Reservation lock HTTP handlers.
//!
//! ```text
//! POST /api/v1/reservation-locks/check-availability
//! POST /api/v1/reservation-locks
//! POST /api/v1/reservation-locks/release
//! POST /api/v1/reservation-locks/consume
//! POST /api/v1/reservation-locks/cleanup-expired
//! ```

use actix_web::{post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CheckAvailabilityRequest, CreateLockRequest, CreateLockResponse};
use crate::domain::{
    CategoryCode, Error, GameCategory, IdentityContext, LockStatus, LockTuple, ReservationLock,
    SessionId, Species, TimeSlot,
};
use crate::domain::ports::AvailabilityReason;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// The hunt selection a claim or availability check addresses.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LockTupleBody {
    pub species: Species,
    #[schema(example = "M0")]
    pub category: CategoryCode,
    #[schema(format = "date", example = "2026-09-20")]
    pub hunt_date: NaiveDate,
    pub time_slot: TimeSlot,
}

impl LockTupleBody {
    fn into_tuple(self, identity: &IdentityContext) -> Result<LockTuple, Error> {
        Ok(LockTuple {
            reserve: identity.require_reserve()?.clone(),
            category: GameCategory {
                species: self.species,
                category: self.category,
            },
            hunt_date: self.hunt_date,
            time_slot: self.time_slot,
        })
    }
}

/// Request payload for an availability check.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityBody {
    #[serde(flatten)]
    pub tuple: LockTupleBody,
    pub session_id: SessionId,
}

/// Availability response payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBody {
    pub available: bool,
    pub remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<AvailabilityReason>,
}

/// Request payload for a binding claim.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLockBody {
    #[serde(flatten)]
    pub tuple: LockTupleBody,
    pub session_id: SessionId,
}

/// Response payload for a granted claim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLockResponseBody {
    #[schema(format = "uuid")]
    pub lock_id: uuid::Uuid,
    #[schema(format = "date-time")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<CreateLockResponse> for CreateLockResponseBody {
    fn from(value: CreateLockResponse) -> Self {
        Self {
            lock_id: value.lock_id,
            expires_at: value.expires_at,
        }
    }
}

/// Request payload addressing the session's current lock.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody {
    pub session_id: SessionId,
}

/// Response payload for a release.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseResponseBody {
    /// Whether a live claim was actually freed.
    pub released: bool,
}

/// Response payload for a consumed lock.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsumedLockBody {
    #[schema(format = "uuid")]
    pub lock_id: uuid::Uuid,
    pub status: LockStatus,
    #[schema(format = "date-time")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<ReservationLock> for ConsumedLockBody {
    fn from(value: ReservationLock) -> Self {
        Self {
            lock_id: value.id,
            status: value.status,
            expires_at: value.expires_at,
        }
    }
}

/// Response payload for the global expiry sweep.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponseBody {
    pub swept: u64,
}

/// Compute remaining capacity for a tuple.
#[utoipa::path(
    post,
    path = "/api/v1/reservation-locks/check-availability",
    request_body = CheckAvailabilityBody,
    responses(
        (status = 200, description = "Availability computed", body = AvailabilityBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reservation-locks"],
    operation_id = "checkAvailability"
)]
#[post("/reservation-locks/check-availability")]
pub async fn check_availability(
    state: web::Data<HttpState>,
    identity: IdentityContext,
    payload: web::Json<CheckAvailabilityBody>,
) -> ApiResult<web::Json<AvailabilityBody>> {
    let body = payload.into_inner();
    let availability = state
        .availability
        .check_availability(CheckAvailabilityRequest {
            tuple: body.tuple.into_tuple(&identity)?,
            session_id: body.session_id,
            hunter_group: identity.hunter_group,
        })
        .await?;

    Ok(web::Json(AvailabilityBody {
        available: availability.available,
        remaining: availability.remaining,
        reason: availability.reason,
    }))
}

/// Attempt a binding claim on a tuple.
#[utoipa::path(
    post,
    path = "/api/v1/reservation-locks",
    request_body = CreateLockBody,
    responses(
        (status = 200, description = "Claim granted", body = CreateLockResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 409, description = "No remaining capacity", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reservation-locks"],
    operation_id = "createReservationLock"
)]
#[post("/reservation-locks")]
pub async fn create_lock(
    state: web::Data<HttpState>,
    identity: IdentityContext,
    payload: web::Json<CreateLockBody>,
) -> ApiResult<web::Json<CreateLockResponseBody>> {
    let body = payload.into_inner();
    let response = state
        .locks
        .create_lock(CreateLockRequest {
            user_id: identity.user_id,
            tuple: body.tuple.into_tuple(&identity)?,
            session_id: body.session_id,
            hunter_group: identity.hunter_group,
        })
        .await?;

    Ok(web::Json(CreateLockResponseBody::from(response)))
}

/// Release the session's current claim.
#[utoipa::path(
    post,
    path = "/api/v1/reservation-locks/release",
    request_body = SessionBody,
    responses(
        (status = 200, description = "Release processed", body = ReleaseResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reservation-locks"],
    operation_id = "releaseReservationLock"
)]
#[post("/reservation-locks/release")]
pub async fn release_lock(
    state: web::Data<HttpState>,
    _identity: IdentityContext,
    payload: web::Json<SessionBody>,
) -> ApiResult<web::Json<ReleaseResponseBody>> {
    let released = state.locks.release_lock(&payload.session_id).await?;
    Ok(web::Json(ReleaseResponseBody { released }))
}

/// Turn the session's current claim into a durable reservation hold.
#[utoipa::path(
    post,
    path = "/api/v1/reservation-locks/consume",
    request_body = SessionBody,
    responses(
        (status = 200, description = "Claim consumed", body = ConsumedLockBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 409, description = "No consumable claim for this session", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reservation-locks"],
    operation_id = "consumeReservationLock"
)]
#[post("/reservation-locks/consume")]
pub async fn consume_lock(
    state: web::Data<HttpState>,
    _identity: IdentityContext,
    payload: web::Json<SessionBody>,
) -> ApiResult<web::Json<ConsumedLockBody>> {
    let consumed = state.locks.consume_lock(&payload.session_id).await?;
    Ok(web::Json(ConsumedLockBody::from(consumed)))
}

/// Sweep every stale active lock. Admin only; the background sweeper calls
/// the same operation on a timer.
#[utoipa::path(
    post,
    path = "/api/v1/reservation-locks/cleanup-expired",
    responses(
        (status = 200, description = "Sweep completed", body = CleanupResponseBody),
        (status = 401, description = "Unauthorized", body = Error),
        (status = 403, description = "Administrative role required", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reservation-locks"],
    operation_id = "cleanupExpiredLocks"
)]
#[post("/reservation-locks/cleanup-expired")]
pub async fn cleanup_expired(
    state: web::Data<HttpState>,
    identity: IdentityContext,
) -> ApiResult<web::Json<CleanupResponseBody>> {
    identity.require_admin()?;
    let swept = state.locks.cleanup_expired_locks().await?;
    Ok(web::Json(CleanupResponseBody { swept }))
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
