//! LedgerReader port - read-only ledger views for UI collaborators.
//!
//! The booking/invoice UI only ever *reads* ledger state after the fact;
//! it never writes payment status directly. This port is that read surface.

use async_trait::async_trait;

use crate::domain::foundation::{BookingId, DomainError, InvoiceId};
use crate::domain::ledger::{Booking, Invoice, PaymentEventRecord};

/// Port for read-only ledger queries.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// List the most recently processed payment events, newest first.
    async fn list_recent_payments(
        &self,
        limit: u32,
    ) -> Result<Vec<PaymentEventRecord>, DomainError>;

    /// Fetch one invoice.
    async fn get_invoice(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError>;

    /// Fetch one booking.
    async fn get_booking(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn LedgerReader) {}
    }
}
