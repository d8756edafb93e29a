//! Shared test doubles and fixture builders.
//!
//! Compiled for unit tests and, behind the `test-support` feature, for the
//! integration suite.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    CategoryCode, GameCategory, LockTuple, QuotaKey, ReserveId, Species, TimeSlot,
};

/// A [`Clock`] whose reading tests can advance deterministically.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Create a clock pinned at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Create a clock pinned at a fixed mid-season instant.
    #[must_use]
    pub fn at_season_start() -> Self {
        Self::new(season_instant(8, 0, 0))
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: Duration) {
        let delta = TimeDelta::from_std(delta).unwrap_or_else(|error| {
            panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
        });
        *self.lock_clock() += delta;
    }

    /// Move the clock forward by whole minutes.
    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock_clock() += TimeDelta::minutes(minutes);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// A fixed instant inside the 2026 hunting season.
#[must_use]
pub fn season_instant(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 15, hour, min, sec)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture instant {hour}:{min}:{sec}"))
}

/// The reserve used across fixtures.
#[must_use]
pub fn reserve() -> ReserveId {
    ReserveId::new("val-grande").unwrap_or_else(|error| panic!("fixture reserve id: {error}"))
}

/// A roe-deer quota key for `category` in the fixture reserve.
#[must_use]
pub fn roe_deer_key(category: &str) -> QuotaKey {
    QuotaKey {
        reserve: reserve(),
        species: Species::RoeDeer,
        category: CategoryCode::new(category)
            .unwrap_or_else(|error| panic!("fixture category: {error}")),
    }
}

/// A morning lock tuple for the given roe-deer category.
#[must_use]
pub fn morning_tuple(category: &str) -> LockTuple {
    let key = roe_deer_key(category);
    LockTuple {
        reserve: key.reserve.clone(),
        category: GameCategory {
            species: key.species,
            category: key.category,
        },
        hunt_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 20)
            .unwrap_or_else(|| panic!("fixture hunt date")),
        time_slot: TimeSlot::Morning,
    }
}
