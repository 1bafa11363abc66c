//! Stripe webhook signature verification.
//!
//! Implements verification of the `Stripe-Signature` header using
//! HMAC-SHA256, with timestamp validation to prevent replay attacks and
//! constant-time comparison to prevent timing attacks.
//!
//! Verification is separate from payload parsing: when no signing secret is
//! configured the service runs in a degraded mode that parses unverified
//! payloads, and that path must share the parser with the verified one.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed age for webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signature (HMAC-SHA256).
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v0=<legacy>]`. Unknown fields
    /// (including the legacy v0 signature) are ignored for forward
    /// compatibility.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("invalid header format".to_string()))?;

            match key.trim() {
                "t" => {
                    timestamp = Some(value.trim().parse().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signature = Some(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                _ => {
                    // Ignore unknown fields for forward compatibility
                }
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?;
        let v1_signature = v1_signature
            .ok_or_else(|| WebhookError::ParseError("missing v1 signature".to_string()))?;

        Ok(SignatureHeader {
            timestamp,
            v1_signature,
        })
    }
}

/// Verifier for processor webhook signatures.
///
/// Holds the webhook signing secret from the processor dashboard. One
/// verifier is constructed at startup when a secret is configured and shared
/// across deliveries.
pub struct WebhookSignatureVerifier {
    secret: SecretString,
}

impl WebhookSignatureVerifier {
    /// Creates a new verifier with the given signing secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Verifies a raw payload against its signature header.
    ///
    /// # Verification Steps
    ///
    /// 1. Parse the signature header
    /// 2. Validate the timestamp is within the acceptable window
    /// 3. Compute the expected signature over `"{timestamp}.{payload}"`
    /// 4. Compare signatures in constant time
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - signature comparison failed
    /// - `TimestampOutOfRange` - event is older than 5 minutes
    /// - `InvalidTimestamp` - event timestamp is in the future
    /// - `ParseError` - malformed signature header
    pub fn verify(&self, payload: &[u8], signature_header: &str) -> Result<(), WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp, chrono::Utc::now().timestamp())?;

        let expected = self.compute_signature(header.timestamp, payload);

        if !constant_time_compare(&expected, &header.v1_signature) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Validates that the timestamp is within acceptable bounds of `now`.
    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        let age = now - timestamp;

        // Reject events that are too old
        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }

        // Reject events from the future (with clock skew tolerance)
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }

        Ok(())
    }

    /// Computes the HMAC-SHA256 signature for the given timestamp and payload.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key size");
        mac.update(signed_payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";

    /// Computes a hex-encoded HMAC-SHA256 signature for test fixtures.
    fn sign(secret: &str, timestamp: i64, payload: &str) -> String {
        let signed_payload = format!("{}.{}", timestamp, payload);
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key size");
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_v1_only() {
        let signature = "a".repeat(64);
        let header_str = format!("t=1234567890,v1={}", signature);

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signature.len(), 32); // 64 hex chars = 32 bytes
    }

    #[test]
    fn parse_header_ignores_v0_and_unknown_fields() {
        let signature = "a".repeat(64);
        let header_str = format!("t=1234567890,v1={},v0={},scheme=hmac", signature, "b".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signature.len(), 32);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let header_str = format!("v1={}", "a".repeat(64));
        let result = SignatureHeader::parse(&header_str);
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        let result = SignatureHeader::parse("t=1234567890");
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_header_invalid_timestamp_fails() {
        let header_str = format!("t=not_a_number,v1={}", "a".repeat(64));
        let result = SignatureHeader::parse(&header_str);
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_header_invalid_hex_fails() {
        let result = SignatureHeader::parse("t=1234567890,v1=not_valid_hex");
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_header_no_equals_fails() {
        let result = SignatureHeader::parse("t1234567890");
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let verifier = WebhookSignatureVerifier::new(TEST_SECRET);
        let payload = r#"{"id":"evt_test123","type":"payment_intent.succeeded"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(TEST_SECRET, timestamp, payload);
        let header = format!("t={},v1={}", timestamp, signature);

        assert!(verifier.verify(payload.as_bytes(), &header).is_ok());
    }

    #[test]
    fn verify_invalid_signature_fails() {
        let verifier = WebhookSignatureVerifier::new(TEST_SECRET);
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let header = format!("t={},v1={}", timestamp, "a".repeat(64));

        let result = verifier.verify(payload.as_bytes(), &header);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let verifier = WebhookSignatureVerifier::new("whsec_wrong_secret");
        let payload = r#"{"id":"evt_test"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(TEST_SECRET, timestamp, payload);
        let header = format!("t={},v1={}", timestamp, signature);

        let result = verifier.verify(payload.as_bytes(), &header);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let verifier = WebhookSignatureVerifier::new(TEST_SECRET);
        let original = r#"{"id":"evt_test","amount":100}"#;
        let tampered = r#"{"id":"evt_test","amount":99900}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(TEST_SECRET, timestamp, original);
        let header = format!("t={},v1={}", timestamp, signature);

        let result = verifier.verify(tampered.as_bytes(), &header);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    // ══════════════════════════════════════════════════════════════
    // Timestamp Validation Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn timestamp_within_range_succeeds() {
        let verifier = WebhookSignatureVerifier::new(TEST_SECRET);
        // 2 minutes old - within the 5 minute window
        assert!(verifier.validate_timestamp(880, 1000).is_ok());
    }

    #[test]
    fn timestamp_too_old_fails() {
        let verifier = WebhookSignatureVerifier::new(TEST_SECRET);
        // 10 minutes old - outside the 5 minute window
        let result = verifier.validate_timestamp(400, 1000);
        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn timestamp_at_boundary_succeeds() {
        let verifier = WebhookSignatureVerifier::new(TEST_SECRET);
        // Exactly 5 minutes old
        assert!(verifier.validate_timestamp(700, 1000).is_ok());
    }

    #[test]
    fn timestamp_just_past_boundary_fails() {
        let verifier = WebhookSignatureVerifier::new(TEST_SECRET);
        // 5 minutes and 1 second old
        let result = verifier.validate_timestamp(699, 1000);
        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn timestamp_from_future_with_skew_succeeds() {
        let verifier = WebhookSignatureVerifier::new(TEST_SECRET);
        // 30 seconds in the future - within the 60s skew tolerance
        assert!(verifier.validate_timestamp(1030, 1000).is_ok());
    }

    #[test]
    fn timestamp_from_future_beyond_skew_fails() {
        let verifier = WebhookSignatureVerifier::new(TEST_SECRET);
        // 2 minutes in the future - beyond the skew tolerance
        let result = verifier.validate_timestamp(1120, 1000);
        assert!(matches!(result, Err(WebhookError::InvalidTimestamp)));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(&[1, 2, 3], &[1, 2, 3]));
    }

    #[test]
    fn constant_time_compare_different_values() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 4]));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
    }

    #[test]
    fn constant_time_compare_empty_slices() {
        assert!(constant_time_compare(&[], &[]));
    }
}
