//! SettlementRetryQueue port - downstream failures after the dedup marker.
//!
//! Once the processed-event record has committed, the webhook must be
//! acknowledged - a retry from the processor would only be deduplicated.
//! If the invoice update then fails, the failure cannot be surfaced through
//! the webhook response, so it is recorded here for operator replay instead
//! of being silently dropped. "Event durably recorded" and "invoice
//! successfully updated" are distinct outcomes.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InvoiceId, Timestamp};

/// A settlement that could not be applied to its invoice.
#[derive(Debug, Clone)]
pub struct SettlementRetry {
    /// Processor event id whose settlement failed.
    pub event_id: String,

    /// Invoice the payment should have settled against.
    pub invoice_id: InvoiceId,

    /// Payment amount in minor units.
    pub amount: i64,

    /// Processor transaction id (payment intent id).
    pub transaction_id: String,

    /// The failure that prevented settlement.
    pub error: String,

    /// When the failure was recorded.
    pub enqueued_at: Timestamp,
}

/// Port for the settlement retry log.
#[async_trait]
pub trait SettlementRetryQueue: Send + Sync {
    /// Record a failed settlement for later replay.
    async fn enqueue(&self, retry: SettlementRetry) -> Result<(), DomainError>;

    /// List failures awaiting replay.
    async fn list_pending(&self) -> Result<Vec<SettlementRetry>, DomainError>;
}
