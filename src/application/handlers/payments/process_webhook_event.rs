//! ProcessWebhookEventHandler - Command handler for inbound processor webhooks.
//!
//! The correctness-critical path. The processor delivers events at least
//! once and in no guaranteed order, so the handler must be safe to invoke
//! any number of times with the same payload and must never double-apply a
//! settlement.
//!
//! ## Ordering contract
//!
//! The processed-event record is inserted *before* any invoice mutation.
//! That insert is the dedup marker: once it commits, a redelivery of the
//! same event id short-circuits, so the settlement can be applied at most
//! once per event. Failures before the marker return 5xx (the processor
//! retries); failures after it are recorded in the settlement retry log and
//! acknowledged, because a retry would only be deduplicated.

use std::sync::Arc;

use crate::domain::foundation::{BookingId, InvoiceId, Timestamp};
use crate::domain::ledger::{PaymentEventRecord, PaymentMethod};
use crate::domain::payments::{
    PaymentEvent, Settlement, StripeEvent, WebhookError, WebhookSignatureVerifier,
};
use crate::ports::{
    BookingRepository, InvoiceRepository, PaymentEventRepository, SaveResult, SettlementRetry,
    SettlementRetryQueue,
};

/// Command carrying one raw webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessWebhookEventCommand {
    /// Raw request body, unparsed so the signature stays verifiable.
    pub payload: Vec<u8>,

    /// The Stripe-Signature header, when present.
    pub signature: Option<String>,
}

/// Outcome of processing a webhook delivery. All variants acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// First sight of an actionable event; `settled` reports whether an
    /// invoice was actually updated.
    Processed { settled: bool },

    /// The event id was already recorded; nothing was reprocessed.
    Duplicate,

    /// Non-actionable event type; recorded and acknowledged.
    Ignored,
}

/// Handler for processor webhook deliveries.
pub struct ProcessWebhookEventHandler {
    verifier: Option<Arc<WebhookSignatureVerifier>>,
    events: Arc<dyn PaymentEventRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    bookings: Arc<dyn BookingRepository>,
    retries: Arc<dyn SettlementRetryQueue>,
}

impl ProcessWebhookEventHandler {
    /// Creates a handler.
    ///
    /// `verifier` is `None` when no signing secret is configured; the
    /// handler then accepts unverified payloads and logs the degraded
    /// posture on every delivery.
    pub fn new(
        verifier: Option<Arc<WebhookSignatureVerifier>>,
        events: Arc<dyn PaymentEventRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        bookings: Arc<dyn BookingRepository>,
        retries: Arc<dyn SettlementRetryQueue>,
    ) -> Self {
        Self {
            verifier,
            events,
            invoices,
            bookings,
            retries,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessWebhookEventCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        // 1. Authenticate the payload, or log the degraded mode.
        match &self.verifier {
            Some(verifier) => {
                let signature = cmd
                    .signature
                    .as_deref()
                    .ok_or(WebhookError::MissingSignatureHeader)?;
                verifier.verify(&cmd.payload, signature)?;
            }
            None => {
                tracing::warn!(
                    "no webhook signing secret configured; accepting unverified payload (test mode only)"
                );
            }
        }

        // 2. Parse at the boundary into the closed variant.
        let envelope = StripeEvent::parse(&cmd.payload)?;
        let event = PaymentEvent::from_envelope(envelope)?;
        let event_id = event.event_id().to_string();
        let now = Timestamp::now();

        // 3. Deduplicate, then record. The fast-path read catches ordinary
        //    redeliveries; the insert is the authoritative marker, and its
        //    first-writer-wins semantics close the race two concurrent
        //    deliveries of the same event would otherwise slip through. It
        //    must commit before any invoice mutation.
        if self.events.find_by_event_id(&event_id).await?.is_some() {
            tracing::info!(event_id = %event_id, "event already processed");
            return Ok(WebhookOutcome::Duplicate);
        }

        let record = PaymentEventRecord::from_event(&event, now);
        match self.events.save(record).await? {
            SaveResult::AlreadyExists => {
                // Lost the insert race; the other delivery owns processing.
                tracing::info!(event_id = %event_id, "event already processed");
                return Ok(WebhookOutcome::Duplicate);
            }
            SaveResult::Inserted => {}
        }

        // 4. Only succeeded intents trigger settlement; everything else is
        //    acknowledged so the processor stops retrying.
        let intent = match event {
            PaymentEvent::IntentSucceeded { intent, .. } => intent,
            PaymentEvent::Other { event_type, .. } => {
                tracing::debug!(
                    event_id = %event_id,
                    event_type = %event_type,
                    "recorded non-actionable event"
                );
                return Ok(WebhookOutcome::Ignored);
            }
        };

        tracing::info!(
            event_id = %event_id,
            intent_id = %intent.id,
            amount = intent.amount,
            invoice_id = ?intent.metadata.invoice_ref(),
            user_id = ?intent.metadata.user_ref(),
            "payment succeeded"
        );

        let invoice_id = match intent.metadata.invoice_ref() {
            None => return Ok(WebhookOutcome::Processed { settled: false }),
            Some(raw) => match raw.parse::<InvoiceId>() {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!(
                        event_id = %event_id,
                        invoice_ref = %raw,
                        "invoice reference is not a valid id; payment recorded without settlement"
                    );
                    return Ok(WebhookOutcome::Processed { settled: false });
                }
            },
        };

        // 5. Settle. The repository applies the balance arithmetic as one
        //    atomic operation keyed by invoice id.
        match self
            .invoices
            .apply_payment(&invoice_id, intent.amount, &intent.id, now)
            .await
        {
            Ok(Some(applied)) => {
                tracing::info!(
                    invoice_id = %invoice_id,
                    status = applied.settlement.status.as_str(),
                    amount_paid = applied.settlement.amount_paid,
                    balance_due = applied.settlement.balance_due,
                    "invoice settled"
                );

                if let Some(booking_id) = applied.booking_id {
                    self.propagate_to_booking(&booking_id, &applied.settlement, now)
                        .await;
                }

                Ok(WebhookOutcome::Processed { settled: true })
            }
            Ok(None) => {
                // The payment record stands even though no invoice could be
                // updated; a data-consistency issue elsewhere must not lose
                // the payment.
                tracing::warn!(
                    invoice_id = %invoice_id,
                    event_id = %event_id,
                    "invoice not found; payment recorded without settlement"
                );
                Ok(WebhookOutcome::Processed { settled: false })
            }
            Err(err) => {
                // The dedup marker already committed, so the processor must
                // not retry; the failure goes to the retry log instead.
                tracing::error!(
                    invoice_id = %invoice_id,
                    event_id = %event_id,
                    error = %err,
                    "invoice update failed after event was recorded"
                );

                let retry = SettlementRetry {
                    event_id: event_id.clone(),
                    invoice_id,
                    amount: intent.amount,
                    transaction_id: intent.id.clone(),
                    error: err.to_string(),
                    enqueued_at: now,
                };
                if let Err(enqueue_err) = self.retries.enqueue(retry).await {
                    tracing::error!(
                        event_id = %event_id,
                        error = %enqueue_err,
                        "failed to record settlement retry"
                    );
                }

                Ok(WebhookOutcome::Processed { settled: false })
            }
        }
    }

    /// Propagates the settlement onto the linked booking.
    ///
    /// The webhook is the authoritative writer of booking payment state;
    /// failures here are operational concerns and never fail the webhook.
    async fn propagate_to_booking(
        &self,
        booking_id: &BookingId,
        settlement: &Settlement,
        now: Timestamp,
    ) {
        match self.bookings.find_by_id(booking_id).await {
            Ok(Some(mut booking)) => {
                booking.record_payment(
                    settlement.booking_payment_status(),
                    PaymentMethod::Stripe,
                    now,
                );
                if let Err(err) = self.bookings.update(&booking).await {
                    tracing::error!(
                        booking_id = %booking_id,
                        error = %err,
                        "failed to update booking payment status"
                    );
                }
            }
            Ok(None) => {
                tracing::warn!(
                    booking_id = %booking_id,
                    "booking linked to settled invoice not found"
                );
            }
            Err(err) => {
                tracing::error!(
                    booking_id = %booking_id,
                    error = %err,
                    "failed to load booking for settlement propagation"
                );
            }
        }
    }
}
