//! Ports - interfaces between the application layer and the outside world.
//!
//! Implementations live under `adapters/`. Tests substitute in-memory fakes.

mod booking_repository;
mod invoice_repository;
mod ledger_reader;
mod payment_event_repository;
mod payment_provider;
mod settlement_retry_queue;
mod user_repository;

pub use booking_repository::BookingRepository;
pub use invoice_repository::{AppliedSettlement, InvoiceRepository};
pub use ledger_reader::LedgerReader;
pub use payment_event_repository::{PaymentEventRepository, SaveResult};
pub use payment_provider::{
    CreateCustomerRequest, CreateIntentRequest, Customer, PaymentError, PaymentErrorCode,
    PaymentIntent, PaymentProvider,
};
pub use settlement_retry_queue::{SettlementRetry, SettlementRetryQueue};
pub use user_repository::{ProfileUpdate, UserRepository};
