//! Ledger domain module.
//!
//! Entity types for the three ledger collections: the append-only
//! processed-payment log (`payments`), mutable invoice balances
//! (`invoices`), and mutable booking state (`bookings`).

mod booking;
mod invoice;
mod payment_record;
mod status;

pub use booking::{Booking, BookingPayment};
pub use invoice::{Invoice, InvoicePayment};
pub use payment_record::PaymentEventRecord;
pub use status::{BookingStatus, InvoiceStatus, PaymentMethod, PaymentStatus};
