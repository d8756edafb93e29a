//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod identity;
pub mod locks;
pub mod quotas;
pub mod reports;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
