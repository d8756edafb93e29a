//! Hunt reports and their ledger effect tracking.
//!
//! A report records the outcome of a completed reservation. A `harvest`
//! outcome permanently consumes one unit of quota; the [`QuotaEffect`]
//! marker remembers whether that increment happened and whether it was
//! later reversed, so deleting the same report twice can never decrement
//! the ledger twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::quota::{GameCategory, HunterGroup, QuotaKey, ReserveId};

/// Outcome of a hunt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HuntOutcome {
    NoHarvest,
    Harvest,
}

/// Ledger effect recorded for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuotaEffect {
    /// The report never incremented a ledger (no-harvest outcome, or the
    /// increment has not been applied yet).
    None,
    /// The report incremented regional (and possibly group) counters.
    Committed,
    /// A previously committed increment has been reversed.
    Reversed,
}

/// Outcome report filed against one reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HuntReport {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub reserve: ReserveId,
    pub outcome: HuntOutcome,
    /// Which harvest-plan line was taken; present iff `outcome == Harvest`.
    pub category: Option<GameCategory>,
    /// Group whose sub-quota the harvest counted against, if any.
    pub hunter_group: Option<HunterGroup>,
    pub effect: QuotaEffect,
    pub reported_at: DateTime<Utc>,
}

/// Validation errors for hunt reports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HuntReportError {
    /// A harvest outcome must identify the harvested category.
    #[error("harvest report must carry a species/category")]
    MissingCategory,
    /// A no-harvest outcome must not carry a category.
    #[error("no-harvest report must not carry a species/category")]
    UnexpectedCategory,
}

impl HuntReport {
    /// Build a freshly filed report with no ledger effect yet.
    pub fn file(
        reservation_id: Uuid,
        reserve: ReserveId,
        outcome: HuntOutcome,
        category: Option<GameCategory>,
        hunter_group: Option<HunterGroup>,
        now: DateTime<Utc>,
    ) -> Result<Self, HuntReportError> {
        match (outcome, category.as_ref()) {
            (HuntOutcome::Harvest, None) => return Err(HuntReportError::MissingCategory),
            (HuntOutcome::NoHarvest, Some(_)) => return Err(HuntReportError::UnexpectedCategory),
            _ => {}
        }
        Ok(Self {
            id: Uuid::new_v4(),
            reservation_id,
            reserve,
            outcome,
            category,
            hunter_group,
            effect: QuotaEffect::None,
            reported_at: now,
        })
    }

    /// Ledger key affected by this report, when it is a harvest.
    #[must_use]
    pub fn quota_key(&self) -> Option<QuotaKey> {
        self.category.as_ref().map(|category| QuotaKey {
            reserve: self.reserve.clone(),
            species: category.species,
            category: category.category.clone(),
        })
    }
}
