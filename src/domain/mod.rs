//! Domain core: quota arithmetic, lock lifecycle, and harvest accounting.

mod availability;
mod error;
mod harvest_service;
mod identity;
mod lock;
mod lock_service;
pub mod ports;
mod quota;
mod quota_admin;
mod report;
mod tuple_gate;

pub use availability::AvailabilityService;
pub use error::{Error, ErrorCode};
pub use harvest_service::HarvestLedgerService;
pub use identity::{IdentityContext, Role};
pub use lock::{
    DEFAULT_LOCK_TTL_MINUTES, LockStatus, LockTuple, ReservationLock, ReservationLockDraft,
    SessionId, TimeSlot,
};
pub use lock_service::LockLifecycleService;
pub use quota::{
    CategoryCode, GameCategory, GroupQuota, HunterGroup, QuotaKey, RegionalQuota, ReserveId,
    Species,
};
pub use quota_admin::QuotaAdminService;
pub use report::{HuntOutcome, HuntReport, QuotaEffect};
pub use tuple_gate::TupleGate;
