//! Payment HTTP endpoints: charge creation and the processor webhook.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateIntentRequestDto, CreateIntentResponseDto, WebhookAck};
pub use handlers::{create_payment_intent, stripe_webhook};
pub use routes::{payment_routes, webhook_routes};
