//! Processed payment event record - the append-only `payments` ledger row.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::payments::PaymentEvent;

/// Durable record of a processed webhook event.
///
/// Keyed by the processor's unique event id; exactly one record exists per
/// distinct event id, ever. The insert of this record is the sole
/// idempotency mechanism for settlement, so it is written *before* any
/// invoice mutation. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEventRecord {
    /// Processor event id (evt_xxx format) - the dedup key.
    pub event_id: String,

    /// Event type string as delivered.
    pub event_type: String,

    /// Payment intent id, for succeeded events.
    pub payment_intent_id: Option<String>,

    /// Charged amount in minor units, for succeeded events.
    pub amount: Option<i64>,

    /// Currency code, for succeeded events.
    pub currency: Option<String>,

    /// Intent status as reported by the processor.
    pub status: Option<String>,

    /// Processor-side event creation time.
    pub created: Timestamp,

    /// Associated user id; `None` for guest charges.
    pub user_id: Option<String>,

    /// Associated invoice id; `None` when the charge carried no invoice.
    pub invoice_id: Option<String>,

    /// Full metadata bag from the intent.
    pub metadata: serde_json::Value,

    /// When this service recorded the event.
    pub processed_at: Timestamp,
}

impl PaymentEventRecord {
    /// Builds the ledger record for a parsed webhook event.
    ///
    /// Guest/unknown sentinels in the metadata are normalized to `None` on
    /// the indexed columns; the raw bag is preserved in `metadata`.
    pub fn from_event(event: &PaymentEvent, processed_at: Timestamp) -> Self {
        match event {
            PaymentEvent::IntentSucceeded {
                event_id,
                created,
                intent,
            } => Self {
                event_id: event_id.clone(),
                event_type: event.event_type().to_string(),
                payment_intent_id: Some(intent.id.clone()),
                amount: Some(intent.amount),
                currency: Some(intent.currency.clone()),
                status: Some(intent.status.clone()),
                created: Timestamp::from_unix_secs(*created),
                user_id: intent.metadata.user_ref().map(str::to_string),
                invoice_id: intent.metadata.invoice_ref().map(str::to_string),
                metadata: serde_json::to_value(&intent.metadata)
                    .unwrap_or(serde_json::Value::Null),
                processed_at,
            },
            PaymentEvent::Other {
                event_id,
                created,
                event_type,
            } => Self {
                event_id: event_id.clone(),
                event_type: event_type.clone(),
                payment_intent_id: None,
                amount: None,
                currency: None,
                status: None,
                created: Timestamp::from_unix_secs(*created),
                user_id: None,
                invoice_id: None,
                metadata: serde_json::Value::Null,
                processed_at,
            },
        }
    }
}
