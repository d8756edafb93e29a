//! Caller identity context supplied by the external authentication layer.
//!
//! The engine never issues sessions itself; the upstream gateway
//! authenticates the caller and forwards who they are, which reserve they
//! belong to, and their hunter group when the reserve is group-managed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::quota::{HunterGroup, ReserveId};

/// Platform role of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Hunter,
    Admin,
    Superadmin,
}

impl Role {
    /// Whether the role may perform administrative ledger writes.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::Superadmin)
    }
}

/// Error raised when parsing an unknown role token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "hunter" => Ok(Self::Hunter),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

/// Authenticated caller context forwarded by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    pub user_id: Uuid,
    pub role: Role,
    /// Reserve membership; superadmins may act without one.
    pub reserve: Option<ReserveId>,
    /// Hunter group membership in group-managed reserves.
    pub hunter_group: Option<HunterGroup>,
}

impl IdentityContext {
    /// The caller's reserve, or an `invalid_request` error when the account
    /// is not associated with one.
    pub fn require_reserve(&self) -> Result<&ReserveId, Error> {
        self.reserve
            .as_ref()
            .ok_or_else(|| Error::invalid_request("caller is not associated with a reserve"))
    }

    /// Reject callers without administrative privileges.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("administrative role required"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::error::ErrorCode;

    fn hunter() -> IdentityContext {
        IdentityContext {
            user_id: Uuid::new_v4(),
            role: Role::Hunter,
            reserve: None,
            hunter_group: None,
        }
    }

    #[rstest]
    fn missing_reserve_is_an_invalid_request() {
        let error = hunter().require_reserve().expect_err("no reserve");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn hunters_cannot_administer() {
        let error = hunter().require_admin().expect_err("not an admin");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::Superadmin)]
    fn admin_roles_pass_the_gate(#[case] role: Role) {
        let identity = IdentityContext { role, ..hunter() };
        assert!(identity.require_admin().is_ok());
    }

    #[rstest]
    fn role_tokens_parse() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("poacher".parse::<Role>().is_err());
    }
}
