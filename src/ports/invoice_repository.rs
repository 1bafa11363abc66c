//! InvoiceRepository port - invoice balance state.

use async_trait::async_trait;

use crate::domain::foundation::{BookingId, DomainError, InvoiceId, Timestamp};
use crate::domain::ledger::Invoice;
use crate::domain::payments::Settlement;

/// Outcome of an applied settlement, as persisted.
#[derive(Debug, Clone)]
pub struct AppliedSettlement {
    pub invoice_id: InvoiceId,

    /// Booking linked to the settled invoice, for payment-status
    /// propagation.
    pub booking_id: Option<BookingId>,

    /// The post-update invoice state.
    pub settlement: Settlement,
}

/// Port for invoice persistence.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Find an invoice by id.
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError>;

    /// Persist a new invoice.
    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError>;

    /// Atomically apply a confirmed payment to an invoice balance.
    ///
    /// Implementations MUST perform the balance arithmetic as a single
    /// atomic operation keyed by the invoice id (an `amount_paid =
    /// amount_paid + $n` style update), so two different settlements for the
    /// same invoice serialize correctly instead of racing a read-modify-write.
    ///
    /// Returns `None` when no invoice with the given id exists; the caller
    /// logs and moves on, because the payment event itself is already
    /// durably recorded.
    async fn apply_payment(
        &self,
        id: &InvoiceId,
        amount: i64,
        transaction_id: &str,
        paid_at: Timestamp,
    ) -> Result<Option<AppliedSettlement>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn InvoiceRepository) {}
    }
}
