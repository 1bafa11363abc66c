//! BookingRepository port - booking state.

use async_trait::async_trait;

use crate::domain::foundation::{BookingId, DomainError};
use crate::domain::ledger::Booking;

/// Port for booking persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find a booking by id.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// Persist a new booking.
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// Update an existing booking.
    async fn update(&self, booking: &Booking) -> Result<(), DomainError>;
}
