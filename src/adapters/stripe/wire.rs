//! Stripe API wire types.
//!
//! These types represent Stripe REST responses as they arrive on the wire,
//! capturing only the fields this service reads.

use serde::Deserialize;

/// Customer object from `POST /v1/customers`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub created: i64,

    #[serde(default)]
    pub deleted: bool,
}

/// Payment intent object from `POST /v1/payment_intents`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,

    /// Absent on intents retrieved with restricted keys; required here
    /// because this service only ever creates intents with its secret key.
    #[serde(default)]
    pub client_secret: Option<String>,

    pub amount: i64,

    pub currency: String,

    pub status: String,
}

/// Error envelope from the Stripe API.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

/// Error body carrying the processor's message.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}
