//! Payment command handlers.

mod create_payment_intent;
mod process_webhook_event;

pub use create_payment_intent::{
    CallerIdentity, CreatePaymentIntentCommand, CreatePaymentIntentHandler,
    CreatePaymentIntentResult,
};
pub use process_webhook_event::{
    ProcessWebhookEventCommand, ProcessWebhookEventHandler, WebhookOutcome,
};
