//! Driven port towards the external booking component.
//!
//! Reservation records themselves are owned by the booking component; this
//! core only notifies it when a report closes a reservation out.

use async_trait::async_trait;
use uuid::Uuid;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by booking gateway adapters.
    pub enum BookingGatewayError {
        /// The booking component could not be reached.
        Unavailable { message: String } =>
            "booking gateway unavailable: {message}",
    }
}

/// Port for marking reservations completed after a report is filed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Mark the reservation as completed.
    async fn mark_completed(&self, reservation_id: Uuid) -> Result<(), BookingGatewayError>;
}
