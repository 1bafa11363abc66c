//! CreatePaymentIntentHandler - Command handler for opening a charge.
//!
//! The charge initiator: resolves the caller's identity, lazily provisions
//! the processor Customer Reference for authenticated callers, and opens a
//! payment intent whose client secret is the only artifact returned.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::payments::{IntentMetadata, PaymentsError, GUEST_USER, UNKNOWN_INVOICE};
use crate::ports::{CreateCustomerRequest, CreateIntentRequest, PaymentProvider, UserRepository};

/// Substituted when neither an authenticated email nor a guest email is
/// available, so the processor call never fails on a missing field.
const FALLBACK_EMAIL: &str = "guest@example.com";

/// Identity of an authenticated caller, as established by the auth layer.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: UserId,

    /// Token-verified email; takes precedence over any client-supplied one.
    pub email: Option<String>,
}

/// Command to open a payment intent.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentCommand {
    /// Amount in minor currency units. Arrives as a JSON number; non-integer
    /// input is defensively rounded rather than rejected.
    pub amount: f64,

    /// Currency code; defaults to "usd".
    pub currency: Option<String>,

    /// Invoice the eventual settlement should apply to.
    pub invoice_id: Option<String>,

    /// Authenticated caller, when there is one.
    pub caller: Option<CallerIdentity>,

    /// Client-supplied email for guest checkout.
    pub guest_email: Option<String>,
}

/// Result of opening a payment intent.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentResult {
    /// Token for the browser widget to confirm the charge. The only
    /// sensitive artifact ever returned from this flow.
    pub client_secret: String,
}

/// Handler for charge creation.
pub struct CreatePaymentIntentHandler {
    users: Arc<dyn UserRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreatePaymentIntentHandler {
    pub fn new(users: Arc<dyn UserRepository>, payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            users,
            payment_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, PaymentsError> {
        let amount = cmd.amount.round() as i64;
        if amount <= 0 {
            return Err(PaymentsError::validation(
                "amount",
                "must be a positive amount in minor currency units",
            ));
        }

        let currency = cmd
            .currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "usd".to_string())
            .to_lowercase();

        // Identity precedence: token-verified email over client-supplied
        // guest email, with a fallback so the processor call never fails on
        // a missing required field.
        let email = cmd
            .caller
            .as_ref()
            .and_then(|c| c.email.clone())
            .or_else(|| cmd.guest_email.clone())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| FALLBACK_EMAIL.to_string());

        // Only authenticated callers get a Customer Reference.
        let customer_id = match &cmd.caller {
            Some(caller) => Some(self.resolve_customer(caller, &email).await?),
            None => None,
        };

        let metadata = IntentMetadata {
            user_id: Some(
                cmd.caller
                    .as_ref()
                    .map(|c| c.user_id.to_string())
                    .unwrap_or_else(|| GUEST_USER.to_string()),
            ),
            invoice_id: Some(
                cmd.invoice_id
                    .filter(|i| !i.is_empty())
                    .unwrap_or_else(|| UNKNOWN_INVOICE.to_string()),
            ),
            email: Some(email),
        };

        let save_payment_method = customer_id.is_some();
        let intent = self
            .payment_provider
            .create_payment_intent(CreateIntentRequest {
                amount,
                currency,
                metadata,
                customer_id,
                save_payment_method,
            })
            .await
            .map_err(|e| PaymentsError::provider(e.to_string()))?;

        Ok(CreatePaymentIntentResult {
            client_secret: intent.client_secret,
        })
    }

    /// Resolves or atomically claims the caller's Customer Reference.
    ///
    /// The read-then-create sequence races when the same user starts two
    /// first-time charges concurrently; the claim converges both on a single
    /// stored reference, and the losing processor customer is only logged.
    async fn resolve_customer(
        &self,
        caller: &CallerIdentity,
        email: &str,
    ) -> Result<String, PaymentsError> {
        if let Some(user) = self.users.find_by_id(&caller.user_id).await? {
            if let Some(existing) = user.stripe_customer_id {
                return Ok(existing);
            }
        }

        let customer = self
            .payment_provider
            .create_customer(CreateCustomerRequest {
                user_id: caller.user_id.clone(),
                email: email.to_string(),
            })
            .await
            .map_err(|e| PaymentsError::provider(e.to_string()))?;

        let stored = self
            .users
            .claim_customer_ref(&caller.user_id, email, &customer.id)
            .await?;

        if stored != customer.id {
            tracing::warn!(
                user_id = %caller.user_id,
                orphaned_customer = %customer.id,
                stored_customer = %stored,
                "lost customer-reference race; using the stored reference"
            );
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::accounts::{Role, User};
    use crate::domain::foundation::{DomainError, Timestamp};
    use crate::ports::{Customer, PaymentError, PaymentIntent, ProfileUpdate};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockUserRepository {
        users: Mutex<Vec<User>>,
        claim_count: AtomicU32,
        /// Simulates losing the claim race: the stored value wins.
        existing_claim: Option<String>,
    }

    impl MockUserRepository {
        fn new() -> Self {
            Self {
                users: Mutex::new(Vec::new()),
                claim_count: AtomicU32::new(0),
                existing_claim: None,
            }
        }

        fn with_user(user: User) -> Self {
            Self {
                users: Mutex::new(vec![user]),
                claim_count: AtomicU32::new(0),
                existing_claim: None,
            }
        }

        fn losing_race(existing: &str) -> Self {
            Self {
                users: Mutex::new(Vec::new()),
                claim_count: AtomicU32::new(0),
                existing_claim: Some(existing.to_string()),
            }
        }

        fn claim_count(&self) -> u32 {
            self.claim_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| &u.id == id)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn claim_customer_ref(
            &self,
            _id: &UserId,
            _email: &str,
            customer_id: &str,
        ) -> Result<String, DomainError> {
            self.claim_count.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .existing_claim
                .clone()
                .unwrap_or_else(|| customer_id.to_string()))
        }

        async fn set_role(
            &self,
            _id: &UserId,
            _role: Role,
            _now: Timestamp,
        ) -> Result<(), DomainError> {
            Ok(())
        }

        async fn list_admins(&self) -> Result<Vec<User>, DomainError> {
            Ok(vec![])
        }

        async fn update_profile(
            &self,
            _id: &UserId,
            _update: ProfileUpdate,
            _now: Timestamp,
        ) -> Result<(), DomainError> {
            Ok(())
        }
    }

    struct MockPaymentProvider {
        customers_created: AtomicU32,
        last_intent_request: Mutex<Option<CreateIntentRequest>>,
        fail_intent: bool,
    }

    impl MockPaymentProvider {
        fn new() -> Self {
            Self {
                customers_created: AtomicU32::new(0),
                last_intent_request: Mutex::new(None),
                fail_intent: false,
            }
        }

        fn failing_intent() -> Self {
            Self {
                customers_created: AtomicU32::new(0),
                last_intent_request: Mutex::new(None),
                fail_intent: true,
            }
        }

        fn customers_created(&self) -> u32 {
            self.customers_created.load(Ordering::SeqCst)
        }

        fn last_request(&self) -> CreateIntentRequest {
            self.last_intent_request
                .lock()
                .unwrap()
                .clone()
                .expect("no intent request captured")
        }
    }

    #[async_trait]
    impl PaymentProvider for MockPaymentProvider {
        async fn create_customer(
            &self,
            request: CreateCustomerRequest,
        ) -> Result<Customer, PaymentError> {
            self.customers_created.fetch_add(1, Ordering::SeqCst);
            Ok(Customer {
                id: "cus_new123".to_string(),
                email: request.email,
                created_at: 1704067200,
            })
        }

        async fn create_payment_intent(
            &self,
            request: CreateIntentRequest,
        ) -> Result<PaymentIntent, PaymentError> {
            if self.fail_intent {
                return Err(PaymentError::invalid_request("Amount below minimum"));
            }
            *self.last_intent_request.lock().unwrap() = Some(request.clone());
            Ok(PaymentIntent {
                id: "pi_test123".to_string(),
                client_secret: "pi_test123_secret_abc".to_string(),
                amount: request.amount,
                currency: request.currency,
                status: "requires_payment_method".to_string(),
            })
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn test_user_id() -> UserId {
        UserId::new("user-42").unwrap()
    }

    fn guest_command(amount: f64) -> CreatePaymentIntentCommand {
        CreatePaymentIntentCommand {
            amount,
            currency: None,
            invoice_id: None,
            caller: None,
            guest_email: None,
        }
    }

    fn authed_command() -> CreatePaymentIntentCommand {
        CreatePaymentIntentCommand {
            amount: 24900.0,
            currency: Some("usd".to_string()),
            invoice_id: Some("5f1c2f4e-9d8a-4b6e-8a3f-111122223333".to_string()),
            caller: Some(CallerIdentity {
                user_id: test_user_id(),
                email: Some("verified@example.com".to_string()),
            }),
            guest_email: Some("spoofed@example.com".to_string()),
        }
    }

    fn handler(
        users: Arc<MockUserRepository>,
        provider: Arc<MockPaymentProvider>,
    ) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(users, provider)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Guest Charge Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn guest_charge_returns_client_secret() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());

        let result = handler(users.clone(), provider.clone())
            .handle(guest_command(24900.0))
            .await
            .unwrap();

        assert!(!result.client_secret.is_empty());
    }

    #[tokio::test]
    async fn guest_charge_never_touches_customer_reference() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());

        handler(users.clone(), provider.clone())
            .handle(guest_command(24900.0))
            .await
            .unwrap();

        assert_eq!(provider.customers_created(), 0);
        assert_eq!(users.claim_count(), 0);
        assert!(provider.last_request().customer_id.is_none());
        assert!(!provider.last_request().save_payment_method);
    }

    #[tokio::test]
    async fn guest_charge_uses_sentinel_metadata_and_fallback_email() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());

        handler(users.clone(), provider.clone())
            .handle(guest_command(24900.0))
            .await
            .unwrap();

        let request = provider.last_request();
        assert_eq!(request.metadata.user_id.as_deref(), Some("guest"));
        assert_eq!(request.metadata.invoice_id.as_deref(), Some("unknown"));
        assert_eq!(request.metadata.email.as_deref(), Some("guest@example.com"));
        assert_eq!(request.currency, "usd");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Authenticated Charge Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_authenticated_charge_creates_exactly_one_customer() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());

        handler(users.clone(), provider.clone())
            .handle(authed_command())
            .await
            .unwrap();

        assert_eq!(provider.customers_created(), 1);
        assert_eq!(users.claim_count(), 1);
        assert_eq!(
            provider.last_request().customer_id.as_deref(),
            Some("cus_new123")
        );
        assert!(provider.last_request().save_payment_method);
    }

    #[tokio::test]
    async fn existing_customer_reference_is_reused() {
        let mut user = User::new(test_user_id(), "verified@example.com", Timestamp::now());
        user.stripe_customer_id = Some("cus_existing".to_string());
        let users = Arc::new(MockUserRepository::with_user(user));
        let provider = Arc::new(MockPaymentProvider::new());

        handler(users.clone(), provider.clone())
            .handle(authed_command())
            .await
            .unwrap();

        assert_eq!(provider.customers_created(), 0);
        assert_eq!(users.claim_count(), 0);
        assert_eq!(
            provider.last_request().customer_id.as_deref(),
            Some("cus_existing")
        );
    }

    #[tokio::test]
    async fn losing_claim_race_adopts_stored_reference() {
        let users = Arc::new(MockUserRepository::losing_race("cus_winner"));
        let provider = Arc::new(MockPaymentProvider::new());

        handler(users.clone(), provider.clone())
            .handle(authed_command())
            .await
            .unwrap();

        // The freshly-created customer lost; the stored one is bound.
        assert_eq!(
            provider.last_request().customer_id.as_deref(),
            Some("cus_winner")
        );
    }

    #[tokio::test]
    async fn token_email_takes_precedence_over_guest_email() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());

        handler(users.clone(), provider.clone())
            .handle(authed_command())
            .await
            .unwrap();

        let request = provider.last_request();
        assert_eq!(
            request.metadata.email.as_deref(),
            Some("verified@example.com")
        );
        assert_eq!(request.metadata.user_id.as_deref(), Some("user-42"));
        assert_eq!(
            request.metadata.invoice_id.as_deref(),
            Some("5f1c2f4e-9d8a-4b6e-8a3f-111122223333")
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Normalization & Error Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn non_integer_amount_is_rounded() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());

        handler(users.clone(), provider.clone())
            .handle(guest_command(24899.6))
            .await
            .unwrap();

        assert_eq!(provider.last_request().amount, 24900);
    }

    #[tokio::test]
    async fn zero_amount_is_rejected() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());

        let result = handler(users, provider).handle(guest_command(0.0)).await;

        assert!(matches!(result, Err(PaymentsError::Validation { .. })));
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());

        let result = handler(users, provider).handle(guest_command(-500.0)).await;

        assert!(matches!(result, Err(PaymentsError::Validation { .. })));
    }

    #[tokio::test]
    async fn currency_is_lowercased() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::new());

        let cmd = CreatePaymentIntentCommand {
            currency: Some("USD".to_string()),
            ..guest_command(1000.0)
        };
        handler(users, provider.clone()).handle(cmd).await.unwrap();

        assert_eq!(provider.last_request().currency, "usd");
    }

    #[tokio::test]
    async fn provider_rejection_is_relayed_as_provider_error() {
        let users = Arc::new(MockUserRepository::new());
        let provider = Arc::new(MockPaymentProvider::failing_intent());

        let result = handler(users, provider).handle(guest_command(10.0)).await;

        match result {
            Err(PaymentsError::Provider(message)) => {
                assert!(message.contains("Amount below minimum"));
            }
            other => panic!("expected provider error, got {:?}", other.err()),
        }
    }
}
