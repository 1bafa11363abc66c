//! Stripe payment gateway adapter.
//!
//! Implements the `PaymentProvider` port against the Stripe REST API with
//! form-encoded requests and basic auth. The gateway is constructed once at
//! the composition root and injected wherever charges are created; no
//! component initializes its own client lazily.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    CreateCustomerRequest, CreateIntentRequest, Customer, PaymentError, PaymentIntent,
    PaymentProvider,
};

use super::wire::{StripeCustomer, StripeErrorResponse, StripePaymentIntent};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment gateway.
pub struct StripeGateway {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeGateway {
    /// Create a new gateway with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Extracts the processor's error message from a failed response.
    async fn error_from_response(response: reqwest::Response) -> PaymentError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<StripeErrorResponse>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or_else(|| format!("Stripe API returned {}", status));

        tracing::error!(status = %status, message = %message, "Stripe API error");

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            PaymentError::new(crate::ports::PaymentErrorCode::RateLimitExceeded, message)
        } else if status.is_client_error() {
            PaymentError::invalid_request(message)
        } else {
            PaymentError::provider(message)
        }
    }
}

#[async_trait]
impl PaymentProvider for StripeGateway {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        let url = format!("{}/v1/customers", self.config.api_base_url);

        let params = vec![
            ("email", request.email.clone()),
            ("metadata[userId]", request.user_id.to_string()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let customer: StripeCustomer = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(Customer {
            id: customer.id,
            email: customer.email.unwrap_or(request.email),
            created_at: customer.created,
        })
    }

    async fn create_payment_intent(
        &self,
        request: CreateIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let mut params = vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency.clone()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        if let Some(user_id) = &request.metadata.user_id {
            params.push(("metadata[userId]", user_id.clone()));
        }
        if let Some(invoice_id) = &request.metadata.invoice_id {
            params.push(("metadata[invoiceId]", invoice_id.clone()));
        }
        if let Some(email) = &request.metadata.email {
            params.push(("metadata[email]", email.clone()));
        }

        if let Some(customer_id) = &request.customer_id {
            params.push(("customer", customer_id.clone()));
            if request.save_payment_method {
                // Retain the card for future off-session charges.
                params.push(("setup_future_usage", "off_session".to_string()));
            }
        }

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            PaymentError::provider("Stripe response missing client_secret")
        })?;

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
            amount: intent.amount,
            currency: intent.currency,
            status: intent.status,
        })
    }
}
