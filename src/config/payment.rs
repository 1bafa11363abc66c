//! Payment configuration (Stripe)

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key (sk_test_... or sk_live_...)
    pub stripe_api_key: String,

    /// Stripe webhook signing secret (whsec_...).
    ///
    /// Optional: when absent, webhook payloads are accepted without
    /// signature verification. That is a degraded, test-only posture and is
    /// logged loudly at startup and on every unverified delivery.
    pub stripe_webhook_secret: Option<String>,

    /// Stripe publishable key (pk_...), handed to the browser payment widget
    pub stripe_publishable_key: Option<String>,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    /// Check whether webhook signature verification is enabled
    pub fn webhook_verification_enabled(&self) -> bool {
        self.stripe_webhook_secret
            .as_ref()
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }

        // Verify key prefixes for safety
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if let Some(secret) = &self.stripe_webhook_secret {
            if !secret.starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }
        if let Some(key) = &self.stripe_publishable_key {
            if !key.starts_with("pk_") {
                return Err(ValidationError::InvalidStripePublishableKey);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_test_mode() {
        let config = PaymentConfig {
            stripe_api_key: "sk_test_xxx".to_string(),
            ..Default::default()
        };
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());
    }

    #[test]
    fn test_is_live_mode() {
        let config = PaymentConfig {
            stripe_api_key: "sk_live_xxx".to_string(),
            ..Default::default()
        };
        assert!(config.is_live_mode());
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_validation_missing_api_key() {
        let config = PaymentConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_webhook_secret_is_allowed() {
        // Degraded mode: the service still starts, just without verification.
        let config = PaymentConfig {
            stripe_api_key: "sk_test_xxx".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(!config.webhook_verification_enabled());
    }

    #[test]
    fn test_validation_invalid_api_key_prefix() {
        let config = PaymentConfig {
            stripe_api_key: "pk_test_xxx".to_string(), // Wrong prefix
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_webhook_secret_prefix() {
        let config = PaymentConfig {
            stripe_api_key: "sk_test_xxx".to_string(),
            stripe_webhook_secret: Some("secret_xxx".to_string()), // Wrong prefix
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = PaymentConfig {
            stripe_api_key: "sk_test_abcd1234".to_string(),
            stripe_webhook_secret: Some("whsec_xyz789".to_string()),
            stripe_publishable_key: Some("pk_test_abcd1234".to_string()),
        };
        assert!(config.validate().is_ok());
        assert!(config.webhook_verification_enabled());
    }
}
