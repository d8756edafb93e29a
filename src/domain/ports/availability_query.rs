//! Driving port for availability checks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::Error;
use crate::domain::lock::{LockTuple, SessionId};
use crate::domain::quota::HunterGroup;

/// Inputs for one availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckAvailabilityRequest {
    pub tuple: LockTuple,
    /// The caller's flow session; their own prior lock for this session is
    /// excluded from the count so a refreshed check does not shrink their
    /// own availability.
    pub session_id: SessionId,
    /// Group membership for group-managed reserves.
    pub hunter_group: Option<HunterGroup>,
}

/// Why a tuple reported as unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityReason {
    /// No regional quota line is configured for the category.
    QuotaNotConfigured,
    /// The regional quota line has been soft-deactivated.
    QuotaInactive,
    /// The category has no sub-allocation for the caller's group.
    GroupNotAllocated,
    /// Regional capacity (ceiling minus harvests minus active claims) is
    /// exhausted.
    RegionalExhausted,
    /// The caller's group capacity is exhausted even though regional
    /// capacity remains.
    GroupExhausted,
}

/// Result of an availability computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Availability {
    pub available: bool,
    /// Units still claimable right now: ceiling minus harvests minus
    /// competing active claims, bound by the tighter of the regional and
    /// group ledgers.
    pub remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<AvailabilityReason>,
}

impl Availability {
    /// An unavailable result with zero remaining capacity.
    #[must_use]
    pub const fn unavailable(reason: AvailabilityReason) -> Self {
        Self {
            available: false,
            remaining: 0,
            reason: Some(reason),
        }
    }

    /// A result carrying `remaining` claimable units.
    #[must_use]
    pub const fn with_remaining(remaining: u32, reason: Option<AvailabilityReason>) -> Self {
        Self {
            available: remaining > 0,
            remaining,
            reason,
        }
    }
}

/// Read-only availability queries; the single source of truth for "can this
/// tuple be claimed now".
#[async_trait]
pub trait AvailabilityQuery: Send + Sync {
    /// Compute remaining capacity for a tuple.
    ///
    /// Side-effect free apart from the opportunistic expiry sweep over the
    /// touched tuple.
    async fn check_availability(
        &self,
        request: CheckAvailabilityRequest,
    ) -> Result<Availability, Error>;
}
