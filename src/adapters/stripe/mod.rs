//! Stripe adapter - implements the payment provider port.

mod gateway;
mod wire;

pub use gateway::{StripeConfig, StripeGateway};
