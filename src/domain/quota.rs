//! Quota ledger entities and the identifiers that key them.
//!
//! A [`RegionalQuota`] is the administratively fixed harvest ceiling for one
//! species/category within one reserve; a [`GroupQuota`] is a sub-allocation
//! of that ceiling to a single hunter group. Both carry a monotonic
//! `harvested` counter that only [harvest commit/restore] and administrative
//! edits may move, and both uphold `harvested <= total` after every committed
//! operation.
//!
//! [harvest commit/restore]: crate::domain::HarvestLedgerService

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a hunting reserve, assigned by the platform registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct ReserveId(String);

/// Validation errors for reserve identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReserveIdError {
    /// The identifier is empty after trimming.
    #[error("reserve id must not be empty")]
    Empty,
}

impl ReserveId {
    /// Construct a reserve identifier, rejecting blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, ReserveIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ReserveIdError::Empty);
        }
        Ok(Self(value))
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ReserveId {
    type Error = ReserveIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReserveId> for String {
    fn from(value: ReserveId) -> Self {
        value.0
    }
}

impl fmt::Display for ReserveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Huntable species managed by the quota ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    RoeDeer,
    RedDeer,
    FallowDeer,
    Mouflon,
    Chamois,
}

impl Species {
    /// Stable wire token for the species.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoeDeer => "roe_deer",
            Self::RedDeer => "red_deer",
            Self::FallowDeer => "fallow_deer",
            Self::Mouflon => "mouflon",
            Self::Chamois => "chamois",
        }
    }
}

/// Error raised when parsing an unknown species token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown species: {0}")]
pub struct SpeciesParseError(pub String);

impl FromStr for Species {
    type Err = SpeciesParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "roe_deer" => Ok(Self::RoeDeer),
            "red_deer" => Ok(Self::RedDeer),
            "fallow_deer" => Ok(Self::FallowDeer),
            "mouflon" => Ok(Self::Mouflon),
            "chamois" => Ok(Self::Chamois),
            other => Err(SpeciesParseError(other.to_owned())),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Harvest-plan category code within a species (`M0`, `CL0`, `DA-M-I`, ...).
///
/// Codes come from the regional harvest plan; the ledger treats them as
/// opaque tokens but rejects blanks and tokens with whitespace so the tuple
/// keys stay well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryCode(String);

/// Validation errors for category codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryCodeError {
    /// The code is empty after trimming.
    #[error("category code must not be empty")]
    Empty,
    /// The code contains whitespace or control characters.
    #[error("category code must not contain whitespace: {0:?}")]
    Malformed(String),
}

impl CategoryCode {
    /// Construct a category code, normalising to upper case.
    pub fn new(value: impl Into<String>) -> Result<Self, CategoryCodeError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CategoryCodeError::Empty);
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CategoryCodeError::Malformed(value));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The normalised code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for CategoryCode {
    type Error = CategoryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryCode> for String {
    fn from(value: CategoryCode) -> Self {
        value.0
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A species/category pair identifying one line of the harvest plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct GameCategory {
    pub species: Species,
    pub category: CategoryCode,
}

impl fmt::Display for GameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.species, self.category)
    }
}

/// Hunter sub-group within a group-managed reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum HunterGroup {
    A,
    B,
    C,
    D,
}

impl HunterGroup {
    /// Stable wire token for the group.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Error raised when parsing an unknown hunter group token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hunter group: {0}")]
pub struct HunterGroupParseError(pub String);

impl FromStr for HunterGroup {
    type Err = HunterGroupParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            other => Err(HunterGroupParseError(other.to_owned())),
        }
    }
}

impl fmt::Display for HunterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key addressing one ledger line: `(reserve, species, category)`.
///
/// All ledger mutation for a key serialises through the same critical
/// section, so this is also the unit of claim serialisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct QuotaKey {
    pub reserve: ReserveId,
    pub species: Species,
    pub category: CategoryCode,
}

impl QuotaKey {
    /// The species/category pair without the reserve component.
    #[must_use]
    pub fn game_category(&self) -> GameCategory {
        GameCategory {
            species: self.species,
            category: self.category.clone(),
        }
    }
}

impl fmt::Display for QuotaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.reserve, self.species, self.category)
    }
}

/// Regional harvest ceiling for one `(reserve, species, category)` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegionalQuota {
    pub key: QuotaKey,
    /// Administratively fixed ceiling for the season.
    pub total: u32,
    /// Confirmed harvests recorded against the ceiling.
    pub harvested: u32,
    /// Soft-deactivation flag; an inactive quota keeps its counters but is
    /// never available for new claims.
    pub active: bool,
}

impl RegionalQuota {
    /// Capacity not yet consumed by confirmed harvests.
    ///
    /// Saturates at zero: an administrative ceiling reduction may leave
    /// `harvested > total` in historical data, which reads as no capacity.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.harvested)
    }
}

/// Sub-allocation of a regional quota to one hunter group.
///
/// For a fixed [`QuotaKey`], the totals across groups may never exceed the
/// regional total; [`QuotaAdminService`] rejects writes that would break
/// this.
///
/// [`QuotaAdminService`]: crate::domain::QuotaAdminService
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroupQuota {
    pub key: QuotaKey,
    pub group: HunterGroup,
    pub total: u32,
    pub harvested: u32,
}

impl GroupQuota {
    /// Capacity not yet consumed by this group's confirmed harvests.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.harvested)
    }
}
