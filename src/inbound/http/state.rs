//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the driving ports and remain testable without real wiring.

use std::sync::Arc;

use crate::domain::ports::{AvailabilityQuery, HarvestLedger, LockLifecycle, QuotaAdministration};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub availability: Arc<dyn AvailabilityQuery>,
    pub locks: Arc<dyn LockLifecycle>,
    pub harvest: Arc<dyn HarvestLedger>,
    pub quotas: Arc<dyn QuotaAdministration>,
}
