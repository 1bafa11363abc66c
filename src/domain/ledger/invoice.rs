//! Invoice entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, InvoiceId, Timestamp};

use super::status::{InvoiceStatus, PaymentMethod, PaymentStatus};

/// Payment sub-record written onto an invoice by settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePayment {
    /// Payment status (`paid_in_full` or `partial` after settlement).
    pub status: PaymentStatus,

    /// Collection method.
    pub method: PaymentMethod,

    /// When the settling payment was applied.
    pub paid_at: Timestamp,

    /// Processor transaction id (the payment intent id).
    pub transaction_id: String,
}

/// Invoice ledger entity.
///
/// Balances are integer minor currency units. The invariants
/// `balance_due == max(0, total - amount_paid)` and
/// `status == Paid iff balance_due == 0` are maintained by the settlement
/// path, which is the only writer of payment state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,

    /// Booking this invoice bills for, when one exists.
    pub booking_id: Option<BookingId>,

    /// Display name of the billed client.
    pub client_name: String,

    /// Invoice total in minor currency units.
    pub total: i64,

    /// Sum of settled payments in minor currency units.
    pub amount_paid: i64,

    /// Remaining balance, never negative.
    pub balance_due: i64,

    pub status: InvoiceStatus,

    /// Present once at least one payment has settled.
    pub payment: Option<InvoicePayment>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Invoice {
    /// Creates an unpaid invoice for the given total.
    pub fn new(id: InvoiceId, client_name: impl Into<String>, total: i64, now: Timestamp) -> Self {
        Self {
            id,
            booking_id: None,
            client_name: client_name.into(),
            total,
            amount_paid: 0,
            balance_due: total,
            status: InvoiceStatus::Unpaid,
            payment: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Links this invoice to a booking.
    pub fn with_booking(mut self, booking_id: BookingId) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    /// Checks the balance invariant: `balance_due = max(0, total -
    /// amount_paid)`, and a paid invoice carries no balance.
    pub fn balance_is_consistent(&self) -> bool {
        self.balance_due == (self.total - self.amount_paid).max(0)
            && (self.status != InvoiceStatus::Paid || self.balance_due == 0)
    }
}
