//! Identity extraction from gateway headers.
//!
//! Authentication lives in the upstream gateway; it forwards the caller's
//! identity in `x-riserva-*` headers, which this extractor materialises
//! into an [`IdentityContext`] so handlers stay free of header plumbing.

use std::future::{Ready, ready};
use std::str::FromStr;

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use uuid::Uuid;

use crate::domain::{Error, HunterGroup, IdentityContext, ReserveId, Role};

pub(crate) const USER_HEADER: &str = "x-riserva-user";
pub(crate) const ROLE_HEADER: &str = "x-riserva-role";
pub(crate) const RESERVE_HEADER: &str = "x-riserva-reserve";
pub(crate) const GROUP_HEADER: &str = "x-riserva-group";

fn header_value<'r>(req: &'r HttpRequest, name: &str) -> Result<Option<&'r str>, Error> {
    match req.headers().get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| Error::unauthorized(format!("{name} header is not valid UTF-8"))),
    }
}

fn required_header<'r>(req: &'r HttpRequest, name: &str) -> Result<&'r str, Error> {
    header_value(req, name)?.ok_or_else(|| Error::unauthorized(format!("{name} header missing")))
}

fn extract_identity(req: &HttpRequest) -> Result<IdentityContext, Error> {
    let user_id = Uuid::parse_str(required_header(req, USER_HEADER)?)
        .map_err(|_| Error::unauthorized(format!("{USER_HEADER} header is not a UUID")))?;
    let role = Role::from_str(required_header(req, ROLE_HEADER)?)
        .map_err(|error| Error::unauthorized(error.to_string()))?;
    let reserve = header_value(req, RESERVE_HEADER)?
        .map(ReserveId::new)
        .transpose()
        .map_err(|error| Error::unauthorized(error.to_string()))?;
    let hunter_group = header_value(req, GROUP_HEADER)?
        .map(HunterGroup::from_str)
        .transpose()
        .map_err(|error| Error::unauthorized(error.to_string()))?;

    Ok(IdentityContext {
        user_id,
        role,
        reserve,
        hunter_group,
    })
}

impl FromRequest for IdentityContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_identity(req))
    }
}
