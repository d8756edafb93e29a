//! Reservation locks: time-bounded exclusive claims on one unit of quota.
//!
//! A lock ties a browser session to a `(reserve, category, date, slot)`
//! tuple for the duration of the booking flow. While `active` and unexpired
//! it consumes one unit of apparent capacity; it leaves that state through
//! exactly one terminal transition (`consumed`, `released`, or `expired`)
//! and is never reactivated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::quota::{GameCategory, HunterGroup, QuotaKey, ReserveId};

/// Default claim lifetime: long enough for the select-confirm flow, short
/// enough that an abandoned flow frees the unit within minutes.
pub const DEFAULT_LOCK_TTL_MINUTES: i64 = 10;

/// Opaque per-flow session identifier, issued by the client and used as the
/// idempotency key for the whole claim lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

/// Validation errors for session identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionIdError {
    /// The identifier is empty after trimming.
    #[error("session id must not be empty")]
    Empty,
}

impl SessionId {
    /// Construct a session identifier, rejecting blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, SessionIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(SessionIdError::Empty);
        }
        Ok(Self(value))
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookable portion of a hunting day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    FullDay,
}

impl TimeSlot {
    /// Stable wire token for the slot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::FullDay => "full_day",
        }
    }
}

/// Error raised when parsing an unknown time slot token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time slot: {0}")]
pub struct TimeSlotParseError(pub String);

impl FromStr for TimeSlot {
    type Err = TimeSlotParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "full_day" => Ok(Self::FullDay),
            other => Err(TimeSlotParseError(other.to_owned())),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit of claim exclusivity: one category on one date and slot within
/// one reserve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct LockTuple {
    pub reserve: ReserveId,
    pub category: GameCategory,
    pub hunt_date: NaiveDate,
    pub time_slot: TimeSlot,
}

impl LockTuple {
    /// The ledger key this tuple draws capacity from.
    #[must_use]
    pub fn quota_key(&self) -> QuotaKey {
        QuotaKey {
            reserve: self.reserve.clone(),
            species: self.category.species,
            category: self.category.category.clone(),
        }
    }
}

impl fmt::Display for LockTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {}",
            self.reserve, self.category, self.hunt_date, self.time_slot
        )
    }
}

/// Lifecycle state of a reservation lock.
///
/// `Active` is the only capacity-consuming state; the other three are
/// terminal and equivalent from the availability engine's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    Active,
    Consumed,
    Released,
    Expired,
}

impl LockStatus {
    /// Whether the state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Active => "active",
            Self::Consumed => "consumed",
            Self::Released => "released",
            Self::Expired => "expired",
        };
        f.write_str(token)
    }
}

/// A temporary exclusive claim on one unit of a lock tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReservationLock {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tuple: LockTuple,
    /// Group of the claiming hunter in group-managed reserves; `None`
    /// elsewhere. Recorded so group availability counts only its own claims.
    pub hunter_group: Option<HunterGroup>,
    pub session_id: SessionId,
    pub status: LockStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Inputs for creating a reservation lock.
#[derive(Debug, Clone)]
pub struct ReservationLockDraft {
    pub user_id: Uuid,
    pub tuple: LockTuple,
    pub hunter_group: Option<HunterGroup>,
    pub session_id: SessionId,
}

impl ReservationLock {
    /// Create an active lock expiring `ttl` after `now`.
    #[must_use]
    pub fn create(draft: ReservationLockDraft, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            tuple: draft.tuple,
            hunter_group: draft.hunter_group,
            session_id: draft.session_id,
            status: LockStatus::Active,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the lock's TTL has elapsed at `now`.
    ///
    /// The boundary instant itself counts as expired: a lock consumes
    /// capacity strictly while `expires_at > now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the lock consumes apparent capacity at `now`.
    #[must_use]
    pub fn consumes_capacity_at(&self, now: DateTime<Utc>) -> bool {
        self.status == LockStatus::Active && !self.is_expired_at(now)
    }
}
