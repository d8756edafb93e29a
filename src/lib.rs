//! Quota allocation and reservation locking engine for hunting reserves.
//!
//! The crate is organised hexagonally: `domain` holds the quota
//! arithmetic, the lock state machine and the driving/driven ports;
//! `inbound::http` adapts REST requests to the driving ports; `outbound`
//! implements the driven ports; `server` wires the two together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
