//! Studio Ledger - Payment settlement service for a studio booking platform
//!
//! This crate implements the payment intent lifecycle and the webhook-driven
//! settlement pipeline: charge creation against the payment processor,
//! idempotent processing of asynchronous processor notifications, and
//! reconciliation of confirmed payments against the invoice/booking ledger.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
