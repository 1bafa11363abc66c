//! Settlement reconciliation - pure balance arithmetic.
//!
//! Computes the invoice state that results from applying one confirmed
//! payment. All money is integer minor currency units; no floating point.
//!
//! This function is deliberately NOT idempotent at the arithmetic level:
//! applying the same payment twice double-counts. At-most-once invocation
//! per processor event is owed entirely to the webhook receiver's
//! record-before-settle dedup step, and that coupling is part of the
//! contract.

use crate::domain::foundation::Timestamp;
use crate::domain::ledger::{InvoicePayment, InvoiceStatus, PaymentMethod, PaymentStatus};

/// The invoice state produced by applying one confirmed payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// New cumulative amount paid.
    pub amount_paid: i64,

    /// New remaining balance, never negative.
    pub balance_due: i64,

    /// New invoice status: `Paid` when the balance reaches zero, else
    /// `Partial`.
    pub status: InvoiceStatus,

    /// Payment sub-record to persist on the invoice.
    pub payment: InvoicePayment,
}

impl Settlement {
    /// Whether this settlement cleared the invoice.
    pub fn is_paid_in_full(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    /// Payment status to propagate onto a linked booking: full payment
    /// versus a deposit still awaiting the remainder.
    pub fn booking_payment_status(&self) -> PaymentStatus {
        if self.is_paid_in_full() {
            PaymentStatus::PaidInFull
        } else {
            PaymentStatus::DepositPaid
        }
    }
}

/// Applies a confirmed payment to an invoice balance.
///
/// `total` and `already_paid` are the invoice's pre-settlement state;
/// `payment_amount` is the confirmed charge. Over-payment never produces a
/// negative balance.
pub fn settle(
    total: i64,
    already_paid: i64,
    payment_amount: i64,
    transaction_id: &str,
    paid_at: Timestamp,
) -> Settlement {
    let amount_paid = already_paid + payment_amount;
    let balance_due = (total - amount_paid).max(0);
    let status = if balance_due == 0 {
        InvoiceStatus::Paid
    } else {
        InvoiceStatus::Partial
    };

    Settlement {
        amount_paid,
        balance_due,
        status,
        payment: InvoicePayment {
            status: if balance_due == 0 {
                PaymentStatus::PaidInFull
            } else {
                PaymentStatus::Partial
            },
            method: PaymentMethod::Stripe,
            paid_at,
            transaction_id: transaction_id.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ══════════════════════════════════════════════════════════════
    // Scenario Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn partial_payment_leaves_balance() {
        let outcome = settle(50000, 0, 20000, "pi_1", Timestamp::now());

        assert_eq!(outcome.amount_paid, 20000);
        assert_eq!(outcome.balance_due, 30000);
        assert_eq!(outcome.status, InvoiceStatus::Partial);
        assert_eq!(outcome.payment.status, PaymentStatus::Partial);
        assert!(!outcome.is_paid_in_full());
    }

    #[test]
    fn final_payment_clears_invoice() {
        // Invoice {total: 50000, amountPaid: 20000} receives 30000.
        let outcome = settle(50000, 20000, 30000, "pi_2", Timestamp::now());

        assert_eq!(outcome.amount_paid, 50000);
        assert_eq!(outcome.balance_due, 0);
        assert_eq!(outcome.status, InvoiceStatus::Paid);
        assert_eq!(outcome.payment.status, PaymentStatus::PaidInFull);
        assert!(outcome.is_paid_in_full());
    }

    #[test]
    fn over_payment_never_goes_negative() {
        let outcome = settle(10000, 5000, 99999, "pi_3", Timestamp::now());

        assert_eq!(outcome.balance_due, 0);
        assert_eq!(outcome.status, InvoiceStatus::Paid);
    }

    #[test]
    fn payment_record_carries_transaction_id_and_method() {
        let paid_at = Timestamp::now();
        let outcome = settle(10000, 0, 10000, "pi_txn_9", paid_at);

        assert_eq!(outcome.payment.transaction_id, "pi_txn_9");
        assert_eq!(outcome.payment.method, PaymentMethod::Stripe);
        assert_eq!(outcome.payment.paid_at, paid_at);
    }

    #[test]
    fn double_application_double_counts() {
        // The arithmetic has no idempotency of its own; the webhook dedup
        // step is what prevents this from ever happening per event id.
        let first = settle(50000, 20000, 30000, "pi_4", Timestamp::now());
        let second = settle(50000, first.amount_paid, 30000, "pi_4", Timestamp::now());

        assert_eq!(second.amount_paid, 80000);
    }

    #[test]
    fn booking_status_follows_settlement() {
        let deposit = settle(50000, 0, 20000, "pi_5", Timestamp::now());
        assert_eq!(deposit.booking_payment_status(), PaymentStatus::DepositPaid);

        let full = settle(50000, 20000, 30000, "pi_5", Timestamp::now());
        assert_eq!(full.booking_payment_status(), PaymentStatus::PaidInFull);
    }

    // ══════════════════════════════════════════════════════════════
    // Property Tests
    // ══════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn balance_arithmetic_holds_for_all_inputs(
            total in 0i64..1_000_000_000,
            already_paid in 0i64..1_000_000_000,
            payment in 0i64..1_000_000_000,
        ) {
            let outcome = settle(total, already_paid, payment, "pi_prop", Timestamp::now());

            prop_assert_eq!(outcome.amount_paid, already_paid + payment);
            prop_assert_eq!(
                outcome.balance_due,
                (total - (already_paid + payment)).max(0)
            );
            prop_assert!(outcome.balance_due >= 0);
            prop_assert_eq!(
                outcome.status == InvoiceStatus::Paid,
                outcome.balance_due == 0
            );
        }
    }
}
