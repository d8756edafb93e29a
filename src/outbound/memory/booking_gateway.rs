//! Recording booking gateway.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{BookingGateway, BookingGatewayError};

/// In-memory [`BookingGateway`] adapter that records completions.
#[derive(Default)]
pub struct InMemoryBookingGateway {
    completed: Mutex<Vec<Uuid>>,
}

impl InMemoryBookingGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reservation ids marked completed so far.
    #[must_use]
    pub fn completed(&self) -> Vec<Uuid> {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl BookingGateway for InMemoryBookingGateway {
    async fn mark_completed(&self, reservation_id: Uuid) -> Result<(), BookingGatewayError> {
        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reservation_id);
        Ok(())
    }
}
