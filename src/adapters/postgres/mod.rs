//! PostgreSQL adapter - sqlx implementations of the ledger ports.

mod booking_repository;
mod invoice_repository;
mod ledger_reader;
mod payment_event_repository;
mod rows;
mod settlement_retry_queue;
mod user_repository;

pub use booking_repository::PostgresBookingRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use ledger_reader::PostgresLedgerReader;
pub use payment_event_repository::PostgresPaymentEventRepository;
pub use settlement_retry_queue::PostgresSettlementRetryQueue;
pub use user_repository::PostgresUserRepository;
