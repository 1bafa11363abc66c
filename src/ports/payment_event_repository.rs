//! PaymentEventRepository port - the append-only processed-event log.
//!
//! This port is what makes webhook handling idempotent. The processor may
//! deliver the same event multiple times (network timeouts, 5xx responses,
//! lost acknowledgements); the PRIMARY KEY on the event id plus
//! `ON CONFLICT DO NOTHING` insert semantics guarantee exactly one record
//! per distinct event id, ever, even under concurrent delivery.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::ledger::PaymentEventRecord;

/// Result of attempting to record a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was inserted (first time seeing this event).
    Inserted,
    /// Record already exists (duplicate delivery).
    AlreadyExists,
}

/// Port for storing and retrieving processed webhook events.
///
/// Implementations must use a storage-level uniqueness constraint on the
/// event id so concurrent deliveries of the same event race safely: exactly
/// one caller observes `Inserted`.
#[async_trait]
pub trait PaymentEventRepository: Send + Sync {
    /// Find a previously recorded event by its processor event id.
    ///
    /// Returns `None` if the event has not been seen.
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<PaymentEventRecord>, DomainError>;

    /// Attempt to record a webhook event.
    ///
    /// Returns `SaveResult::Inserted` if this is the first time seeing the
    /// event, or `SaveResult::AlreadyExists` if a record with the same event
    /// id was already committed (by this or any concurrent invocation).
    async fn save(&self, record: PaymentEventRecord) -> Result<SaveResult, DomainError>;
}
