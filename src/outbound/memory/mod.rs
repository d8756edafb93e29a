//! In-memory adapters.
//!
//! Plain map-backed stores behind `std::sync::RwLock`. Every compound
//! mutation happens under a single write guard, and the domain services
//! serialise read-decide-write sequences through the per-key gate, so no
//! adapter needs transactions of its own.

mod booking_gateway;
mod lock_store;
mod quota_ledger;
mod report_store;

pub use booking_gateway::InMemoryBookingGateway;
pub use lock_store::InMemoryLockStore;
pub use quota_ledger::InMemoryQuotaLedger;
pub use report_store::InMemoryReportStore;
