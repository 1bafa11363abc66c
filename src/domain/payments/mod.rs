//! Payments domain module.
//!
//! The correctness core of the service: parsing and authenticating processor
//! webhook events, and reconciling confirmed payments against invoice
//! balances.
//!
//! # Module Structure
//!
//! - `stripe_event` - raw webhook envelope and the closed event variant
//! - `webhook_verifier` - HMAC-SHA256 signature verification
//! - `webhook_errors` - webhook error taxonomy with HTTP mapping
//! - `settlement` - pure balance reconciliation
//! - `errors` - charge-initiation error taxonomy

mod errors;
mod settlement;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use errors::PaymentsError;
pub use settlement::{settle, Settlement};
pub use stripe_event::{
    IntentMetadata, PaymentEvent, PaymentIntentObject, StripeEvent, StripeEventData, GUEST_USER,
    INTENT_SUCCEEDED, UNKNOWN_INVOICE,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{SignatureHeader, WebhookSignatureVerifier};
