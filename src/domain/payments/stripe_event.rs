//! Stripe webhook event types.
//!
//! The processor delivers a loosely-typed JSON envelope. Everything past the
//! HTTP boundary operates on [`PaymentEvent`], a closed variant covering only
//! the event shapes this service acts on; every other type is carried as
//! `Other` so it can be acknowledged and recorded without being interpreted.

use serde::{Deserialize, Serialize};

use super::webhook_errors::WebhookError;

/// Metadata sentinel for charges made without an authenticated user.
pub const GUEST_USER: &str = "guest";

/// Metadata sentinel for charges made without an invoice reference.
pub const UNKNOWN_INVOICE: &str = "unknown";

/// Event type string for a succeeded payment intent.
pub const INTENT_SUCCEEDED: &str = "payment_intent.succeeded";

/// Raw Stripe webhook envelope (simplified).
///
/// Contains the essential fields needed for webhook processing. Additional
/// fields from Stripe's full event schema are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Parses a raw webhook payload into the envelope.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the payload is not valid JSON
    /// or is missing required envelope fields.
    pub fn parse(payload: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }
}

/// The metadata bag attached to a payment intent at charge creation.
///
/// Written by the charge initiator, read back from the webhook. Absent keys
/// deserialize to `None`; the `"guest"` / `"unknown"` sentinels are treated
/// as absent by the accessors.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IntentMetadata {
    /// Internal user id, or `"guest"` for unauthenticated charges.
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,

    /// Invoice id the charge settles against, or `"unknown"`.
    #[serde(rename = "invoiceId", default)]
    pub invoice_id: Option<String>,

    /// Email captured at checkout.
    #[serde(default)]
    pub email: Option<String>,
}

impl IntentMetadata {
    /// The user reference, with the guest sentinel normalized away.
    pub fn user_ref(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .filter(|v| !v.is_empty() && *v != GUEST_USER)
    }

    /// The invoice reference, with the unknown sentinel normalized away.
    pub fn invoice_ref(&self) -> Option<&str> {
        self.invoice_id
            .as_deref()
            .filter(|v| !v.is_empty() && *v != UNKNOWN_INVOICE)
    }
}

/// Payment intent object as delivered inside a succeeded event.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentIntentObject {
    /// Processor's intent id (pi_xxx format).
    pub id: String,

    /// Charged amount in minor currency units.
    pub amount: i64,

    /// Lowercase currency code.
    pub currency: String,

    /// Intent status as reported by the processor.
    pub status: String,

    /// Metadata bag written at charge creation.
    #[serde(default)]
    pub metadata: IntentMetadata,
}

/// Closed variant of the webhook event types this service handles.
///
/// Only `payment_intent.succeeded` triggers settlement; everything else is
/// acknowledged and recorded without interpretation.
#[derive(Debug, Clone)]
pub enum PaymentEvent {
    /// A payment intent was confirmed and captured.
    IntentSucceeded {
        event_id: String,
        created: i64,
        intent: PaymentIntentObject,
    },

    /// Any other event type: accepted so the processor stops retrying,
    /// never acted upon.
    Other {
        event_id: String,
        created: i64,
        event_type: String,
    },
}

impl PaymentEvent {
    /// Narrows a raw envelope to the closed variant.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` when a succeeded event carries a
    /// malformed payment intent object.
    pub fn from_envelope(envelope: StripeEvent) -> Result<Self, WebhookError> {
        if envelope.event_type == INTENT_SUCCEEDED {
            let intent: PaymentIntentObject = serde_json::from_value(envelope.data.object)
                .map_err(|e| {
                    WebhookError::ParseError(format!("invalid payment intent object: {}", e))
                })?;
            Ok(PaymentEvent::IntentSucceeded {
                event_id: envelope.id,
                created: envelope.created,
                intent,
            })
        } else {
            Ok(PaymentEvent::Other {
                event_id: envelope.id,
                created: envelope.created,
                event_type: envelope.event_type,
            })
        }
    }

    /// The processor's unique event id (the idempotency key).
    pub fn event_id(&self) -> &str {
        match self {
            PaymentEvent::IntentSucceeded { event_id, .. } => event_id,
            PaymentEvent::Other { event_id, .. } => event_id,
        }
    }

    /// The event type string.
    pub fn event_type(&self) -> &str {
        match self {
            PaymentEvent::IntentSucceeded { .. } => INTENT_SUCCEEDED,
            PaymentEvent::Other { event_type, .. } => event_type,
        }
    }

    /// Processor-side creation time (Unix seconds).
    pub fn created(&self) -> i64 {
        match self {
            PaymentEvent::IntentSucceeded { created, .. } => *created,
            PaymentEvent::Other { created, .. } => *created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn succeeded_payload() -> Vec<u8> {
        json!({
            "id": "evt_1234567890",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {
                "object": {
                    "id": "pi_abc123",
                    "amount": 24900,
                    "currency": "usd",
                    "status": "succeeded",
                    "metadata": {
                        "userId": "user-42",
                        "invoiceId": "5f1c2f4e-9d8a-4b6e-8a3f-111122223333",
                        "email": "client@example.com"
                    }
                }
            },
            "livemode": false
        })
        .to_string()
        .into_bytes()
    }

    // ══════════════════════════════════════════════════════════════
    // Envelope Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_minimal_envelope() {
        let envelope = StripeEvent::parse(&succeeded_payload()).unwrap();

        assert_eq!(envelope.id, "evt_1234567890");
        assert_eq!(envelope.event_type, "payment_intent.succeeded");
        assert_eq!(envelope.created, 1704067200);
        assert!(!envelope.livemode);
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let result = StripeEvent::parse(b"not valid json");
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_rejects_missing_envelope_fields() {
        let payload = json!({"id": "evt_1"}).to_string();
        let result = StripeEvent::parse(payload.as_bytes());
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Event Narrowing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn succeeded_event_narrows_to_intent_succeeded() {
        let envelope = StripeEvent::parse(&succeeded_payload()).unwrap();
        let event = PaymentEvent::from_envelope(envelope).unwrap();

        match event {
            PaymentEvent::IntentSucceeded { intent, .. } => {
                assert_eq!(intent.id, "pi_abc123");
                assert_eq!(intent.amount, 24900);
                assert_eq!(intent.currency, "usd");
                assert_eq!(intent.metadata.user_ref(), Some("user-42"));
            }
            other => panic!("expected IntentSucceeded, got {:?}", other),
        }
    }

    #[test]
    fn unrelated_event_narrows_to_other() {
        let payload = json!({
            "id": "evt_charge",
            "type": "charge.refunded",
            "created": 1704067200,
            "data": {"object": {"id": "ch_1"}},
            "livemode": true
        })
        .to_string();

        let envelope = StripeEvent::parse(payload.as_bytes()).unwrap();
        let event = PaymentEvent::from_envelope(envelope).unwrap();

        assert!(matches!(event, PaymentEvent::Other { .. }));
        assert_eq!(event.event_type(), "charge.refunded");
        assert_eq!(event.event_id(), "evt_charge");
    }

    #[test]
    fn succeeded_event_with_malformed_intent_fails() {
        let payload = json!({
            "id": "evt_bad",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {"object": {"id": "pi_1"}},
            "livemode": false
        })
        .to_string();

        let envelope = StripeEvent::parse(payload.as_bytes()).unwrap();
        let result = PaymentEvent::from_envelope(envelope);

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn succeeded_event_without_metadata_defaults_to_empty_bag() {
        let payload = json!({
            "id": "evt_nometa",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {
                "object": {
                    "id": "pi_1",
                    "amount": 5000,
                    "currency": "usd",
                    "status": "succeeded"
                }
            },
            "livemode": false
        })
        .to_string();

        let envelope = StripeEvent::parse(payload.as_bytes()).unwrap();
        let event = PaymentEvent::from_envelope(envelope).unwrap();

        match event {
            PaymentEvent::IntentSucceeded { intent, .. } => {
                assert!(intent.metadata.user_ref().is_none());
                assert!(intent.metadata.invoice_ref().is_none());
            }
            other => panic!("expected IntentSucceeded, got {:?}", other),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Metadata Sentinel Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn guest_sentinel_normalizes_to_none() {
        let metadata = IntentMetadata {
            user_id: Some("guest".to_string()),
            invoice_id: Some("unknown".to_string()),
            email: Some("guest@example.com".to_string()),
        };

        assert!(metadata.user_ref().is_none());
        assert!(metadata.invoice_ref().is_none());
    }

    #[test]
    fn real_references_pass_through() {
        let metadata = IntentMetadata {
            user_id: Some("user-7".to_string()),
            invoice_id: Some("inv-9".to_string()),
            email: None,
        };

        assert_eq!(metadata.user_ref(), Some("user-7"));
        assert_eq!(metadata.invoice_ref(), Some("inv-9"));
    }

    #[test]
    fn empty_strings_normalize_to_none() {
        let metadata = IntentMetadata {
            user_id: Some(String::new()),
            invoice_id: Some(String::new()),
            email: None,
        };

        assert!(metadata.user_ref().is_none());
        assert!(metadata.invoice_ref().is_none());
    }
}
