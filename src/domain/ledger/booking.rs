//! Booking entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, Timestamp};

use super::status::{BookingStatus, PaymentMethod, PaymentStatus};

/// Payment sub-record on a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayment {
    pub status: PaymentStatus,
    pub method: Option<PaymentMethod>,
    pub paid_at: Option<Timestamp>,
}

impl BookingPayment {
    /// Initial payment state for a new booking.
    pub fn pending() -> Self {
        Self {
            status: PaymentStatus::Pending,
            method: None,
            paid_at: None,
        }
    }
}

/// Booking ledger entity.
///
/// Bookings are created `Pending` awaiting admin approval. The webhook
/// settlement path is the authoritative writer of the payment sub-record;
/// client-facing code only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub client_name: String,
    pub client_email: String,
    pub status: BookingStatus,
    pub payment: BookingPayment,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// Creates a new booking awaiting admin approval.
    pub fn new(
        id: BookingId,
        client_name: impl Into<String>,
        client_email: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            client_name: client_name.into(),
            client_email: client_email.into(),
            status: BookingStatus::Pending,
            payment: BookingPayment::pending(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Records a settled payment against this booking.
    ///
    /// A booking waiting on payment is promoted to `Confirmed` once paid in
    /// full; a deposit leaves it in `PendingPayment`.
    pub fn record_payment(
        &mut self,
        status: PaymentStatus,
        method: PaymentMethod,
        paid_at: Timestamp,
    ) {
        self.payment = BookingPayment {
            status,
            method: Some(method),
            paid_at: Some(paid_at),
        };

        if status == PaymentStatus::PaidInFull && self.status == BookingStatus::PendingPayment {
            self.status = BookingStatus::Confirmed;
        }

        self.updated_at = paid_at;
    }
}
