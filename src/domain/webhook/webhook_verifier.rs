//! Stripe webhook signature verification.
//!
//! Implements verification of Stripe webhook signatures using HMAC-SHA256
//! over the raw request body. Includes timestamp validation to reject stale
//! or replayed deliveries.
//!
//! Verification runs strictly before decoding: the payload is only parsed
//! into a [`VerifiedEvent`] once a signature in the header matched.

use axum::body::Bytes;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::{StripeEvent, VerifiedEvent};
use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Default maximum age for webhook events (5 minutes, Stripe's default).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Default allowed clock skew for events stamped in the future.
pub const DEFAULT_CLOCK_SKEW_SECS: i64 = 60;

/// Request body exactly as it arrived on the wire.
#[derive(Debug, Clone)]
pub struct RawPayload(Bytes);

impl RawPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for RawPayload {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for RawPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// All v1 signatures (HMAC-SHA256). Stripe sends several while a
    /// signing secret is being rolled.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedHeader` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures: Vec<Vec<u8>> = Vec::new();

        for part in header.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::MalformedHeader("invalid header format".to_string()))?;

            match key.trim() {
                "t" => {
                    timestamp = Some(value.trim().parse().map_err(|_| {
                        WebhookError::MalformedHeader("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    let signature = hex::decode(value.trim()).map_err(|_| {
                        WebhookError::MalformedHeader("invalid v1 signature hex".to_string())
                    })?;
                    v1_signatures.push(signature);
                }
                _ => {
                    // v0 and unknown schemes are ignored for forward compatibility
                }
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| WebhookError::MalformedHeader("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::MalformedHeader(
                "no signatures found with expected scheme".to_string(),
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
///
/// Holds no per-request state: verifying the same payload and header any
/// number of times yields the same result.
#[derive(Debug, Clone)]
pub struct StripeWebhookVerifier {
    /// The webhook signing secret from Stripe dashboard.
    secret: SecretString,
    tolerance_secs: i64,
    clock_skew_secs: i64,
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the given webhook secret and default windows.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            clock_skew_secs: DEFAULT_CLOCK_SKEW_SECS,
        }
    }

    /// Sets the maximum accepted event age in seconds.
    pub fn with_tolerance(mut self, secs: i64) -> Self {
        self.tolerance_secs = secs;
        self
    }

    /// Sets how far in the future a timestamp may be, in seconds.
    pub fn with_clock_skew(mut self, secs: i64) -> Self {
        self.clock_skew_secs = secs;
        self
    }

    /// Verifies the webhook signature against the current time and decodes the event.
    pub fn verify(
        &self,
        payload: &RawPayload,
        signature_header: &str,
    ) -> Result<VerifiedEvent, WebhookError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    /// Verifies the webhook signature as of `now` and decodes the event.
    ///
    /// # Verification Steps
    ///
    /// 1. Parse the signature header
    /// 2. Compute expected signature using HMAC-SHA256 over `"{t}.{payload}"`
    /// 3. Compare against every v1 signature in constant time
    /// 4. Validate timestamp is within the tolerance window
    /// 5. Decode the JSON payload into a StripeEvent
    ///
    /// # Errors
    ///
    /// - `MalformedHeader` - Header could not be parsed
    /// - `InvalidSignature` - No signature matched
    /// - `TimestampOutOfRange` - Event is older than the tolerance
    /// - `InvalidTimestamp` - Event timestamp is too far in the future
    /// - `ParseError` - Signed payload is not a Stripe event
    pub fn verify_at(
        &self,
        payload: &RawPayload,
        signature_header: &str,
        now: i64,
    ) -> Result<VerifiedEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        let expected_signature = self.compute_signature(header.timestamp, payload.as_bytes())?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected_signature, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        self.validate_timestamp(header.timestamp, now)?;

        let event: StripeEvent = serde_json::from_slice(payload.as_bytes())
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        Ok(VerifiedEvent::new(event))
    }

    /// Builds a `stripe-signature` header value for `payload`, the way Stripe
    /// would sign it with this secret. Useful for replaying fixtures locally.
    pub fn generate_test_header(
        &self,
        payload: &[u8],
        timestamp: i64,
    ) -> Result<String, WebhookError> {
        let signature = self.compute_signature(timestamp, payload)?;
        Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
    }

    /// Validates that the timestamp is within acceptable bounds.
    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        // Header timestamps are attacker-chosen; saturate instead of overflowing.
        let age = now.saturating_sub(timestamp);

        if age > self.tolerance_secs {
            return Err(WebhookError::TimestampOutOfRange);
        }

        if age < self.clock_skew_secs.saturating_neg() {
            return Err(WebhookError::InvalidTimestamp);
        }

        Ok(())
    }

    /// Computes the HMAC-SHA256 signature for the given timestamp and raw payload.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// This prevents timing attacks that could leak information about the expected signature.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "whsec_test_secret_12345";
    const NOW: i64 = 1_717_000_000;
    const CHECKOUT_PAYLOAD: &str = r#"{"id":"evt_test123","type":"checkout.session.completed","created":1717000000,"data":{"object":{"id":"cs_test_123","client_reference_id":"ref-1"}},"livemode":false,"api_version":"2024-04-10"}"#;

    fn signed(secret: &str, payload: &str, timestamp: i64) -> String {
        StripeWebhookVerifier::new(secret)
            .generate_test_header(payload.as_bytes(), timestamp)
            .unwrap()
    }

    fn raw(payload: &str) -> RawPayload {
        RawPayload::from(payload.as_bytes().to_vec())
    }

    // ══════════════════════════════════════════════════════════════
    // SignatureHeader Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_v1_only() {
        let header_str = format!("t=1234567890,v1={}", "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signatures.len(), 1);
        assert_eq!(header.v1_signatures[0].len(), 32);
    }

    #[test]
    fn parse_header_collects_multiple_v1_signatures() {
        let header_str = format!(
            "t=1234567890,v1={},v1={},v0={}",
            "a".repeat(64),
            "b".repeat(64),
            "c".repeat(64)
        );

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.v1_signatures.len(), 2);
    }

    #[test]
    fn parse_header_ignores_unknown_fields() {
        let header_str = format!("t=1234567890,v1={},v2=future,scheme=hmac", "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signatures.len(), 1);
    }

    #[test]
    fn parse_header_tolerates_whitespace() {
        let header_str = format!(" t=1234567890 , v1={} ", "a".repeat(64));

        let header = SignatureHeader::parse(&header_str).unwrap();

        assert_eq!(header.timestamp, 1234567890);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let header_str = format!("v1={}", "a".repeat(64));

        let result = SignatureHeader::parse(&header_str);

        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        let result = SignatureHeader::parse("t=1234567890");

        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_with_only_v0_fails() {
        let header_str = format!("t=1234567890,v0={}", "a".repeat(64));

        let result = SignatureHeader::parse(&header_str);

        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_invalid_timestamp_fails() {
        let header_str = format!("t=not_a_number,v1={}", "a".repeat(64));

        let result = SignatureHeader::parse(&header_str);

        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_invalid_hex_fails() {
        let result = SignatureHeader::parse("t=1234567890,v1=not_valid_hex");

        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_header_no_equals_fails() {
        let result = SignatureHeader::parse("t1234567890");

        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    #[test]
    fn parse_empty_header_fails() {
        let result = SignatureHeader::parse("");

        assert!(matches!(result, Err(WebhookError::MalformedHeader(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW);

        let event = verifier
            .verify_at(&raw(CHECKOUT_PAYLOAD), &header, NOW)
            .unwrap();

        assert_eq!(event.event().id, "evt_test123");
        assert_eq!(event.event().event_type, "checkout.session.completed");
        assert_eq!(event.event().data.object["id"], "cs_test_123");
    }

    #[test]
    fn verify_with_current_clock() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = signed(TEST_SECRET, CHECKOUT_PAYLOAD, chrono::Utc::now().timestamp());

        let result = verifier.verify(&raw(CHECKOUT_PAYLOAD), &header);

        assert!(result.is_ok());
    }

    #[test]
    fn verify_invalid_signature_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = format!("t={},v1={}", NOW, "a".repeat(64));

        let result = verifier.verify_at(&raw(CHECKOUT_PAYLOAD), &header, NOW);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let verifier = StripeWebhookVerifier::new("whsec_wrong_secret");
        let header = signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW);

        let result = verifier.verify_at(&raw(CHECKOUT_PAYLOAD), &header, NOW);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_tampered_payload_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW);
        let tampered = CHECKOUT_PAYLOAD.replace("cs_test_123", "cs_test_999");

        let result = verifier.verify_at(&raw(&tampered), &header, NOW);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_reserialized_payload_fails() {
        // Same JSON value, different bytes: verification must use the raw body.
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW);
        let value: serde_json::Value = serde_json::from_str(CHECKOUT_PAYLOAD).unwrap();
        let pretty = serde_json::to_string_pretty(&value).unwrap();

        let result = verifier.verify_at(&raw(&pretty), &header, NOW);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_changed_timestamp_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let signature = signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW);
        let forged = signature.replacen(&format!("t={}", NOW), &format!("t={}", NOW + 1), 1);

        let result = verifier.verify_at(&raw(CHECKOUT_PAYLOAD), &forged, NOW);

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[test]
    fn verify_accepts_any_matching_v1_signature() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let valid = signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW);
        let valid_sig = valid.split_once("v1=").unwrap().1;
        let header = format!("t={},v1={},v1={}", NOW, "b".repeat(64), valid_sig);

        let result = verifier.verify_at(&raw(CHECKOUT_PAYLOAD), &header, NOW);

        assert!(result.is_ok());
    }

    #[test]
    fn verify_is_repeatable() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let payload = raw(CHECKOUT_PAYLOAD);
        let header = signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW);

        let first = verifier.verify_at(&payload, &header, NOW).unwrap();
        let second = verifier.verify_at(&payload, &header, NOW).unwrap();
        assert_eq!(first.event().id, second.event().id);

        let bad_header = signed("whsec_other", CHECKOUT_PAYLOAD, NOW);
        assert!(verifier.verify_at(&payload, &bad_header, NOW).is_err());
        assert!(verifier.verify_at(&payload, &bad_header, NOW).is_err());
    }

    // ══════════════════════════════════════════════════════════════
    // Timestamp Validation Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_timestamp_within_range_succeeds() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);

        assert!(verifier.validate_timestamp(NOW - 120, NOW).is_ok());
    }

    #[test]
    fn verify_timestamp_at_boundary_succeeds() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);

        assert!(verifier.validate_timestamp(NOW - 300, NOW).is_ok());
    }

    #[test]
    fn verify_timestamp_just_past_boundary_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);

        let result = verifier.validate_timestamp(NOW - 301, NOW);

        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn verify_timestamp_from_future_with_skew_succeeds() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);

        assert!(verifier.validate_timestamp(NOW + 30, NOW).is_ok());
    }

    #[test]
    fn verify_timestamp_from_future_beyond_skew_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);

        let result = verifier.validate_timestamp(NOW + 120, NOW);

        assert!(matches!(result, Err(WebhookError::InvalidTimestamp)));
    }

    #[test]
    fn custom_tolerance_is_honored() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET).with_tolerance(30);

        assert!(verifier.validate_timestamp(NOW - 30, NOW).is_ok());
        assert!(matches!(
            verifier.validate_timestamp(NOW - 31, NOW),
            Err(WebhookError::TimestampOutOfRange)
        ));
    }

    #[test]
    fn custom_clock_skew_is_honored() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET).with_clock_skew(0);

        assert!(matches!(
            verifier.validate_timestamp(NOW + 1, NOW),
            Err(WebhookError::InvalidTimestamp)
        ));
    }

    #[test]
    fn extreme_timestamps_are_rejected_without_overflow() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);

        assert!(matches!(
            verifier.validate_timestamp(i64::MIN, NOW),
            Err(WebhookError::TimestampOutOfRange)
        ));
        assert!(matches!(
            verifier.validate_timestamp(i64::MAX, NOW),
            Err(WebhookError::InvalidTimestamp)
        ));
    }

    #[test]
    fn verify_signed_payload_with_minimum_timestamp_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = signed(TEST_SECRET, CHECKOUT_PAYLOAD, i64::MIN);

        let result = verifier.verify_at(&raw(CHECKOUT_PAYLOAD), &header, NOW);

        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    #[test]
    fn verify_stale_signed_payload_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let header = signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW - 600);

        let result = verifier.verify_at(&raw(CHECKOUT_PAYLOAD), &header, NOW);

        assert!(matches!(result, Err(WebhookError::TimestampOutOfRange)));
    }

    // ══════════════════════════════════════════════════════════════
    // JSON Decoding Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_signed_invalid_json_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let payload = "not valid json";
        let header = signed(TEST_SECRET, payload, NOW);

        let result = verifier.verify_at(&raw(payload), &header, NOW);

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn verify_signed_json_that_is_not_an_event_fails() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let payload = r#"{"hello":"world"}"#;
        let header = signed(TEST_SECRET, payload, NOW);

        let result = verifier.verify_at(&raw(payload), &header, NOW);

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn signature_covers_non_utf8_bytes() {
        let verifier = StripeWebhookVerifier::new(TEST_SECRET);
        let good = vec![0xff, 0xfe, b'{', b'}'];
        let bad = vec![0xff, 0xfd, b'{', b'}'];
        let header = verifier.generate_test_header(&good, NOW).unwrap();

        let tampered = verifier.verify_at(&RawPayload::from(bad), &header, NOW);
        let original = verifier.verify_at(&RawPayload::from(good), &header, NOW);

        assert!(matches!(tampered, Err(WebhookError::InvalidSignature)));
        // Signature matches, decoding is what fails.
        assert!(matches!(original, Err(WebhookError::ParseError(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_equal_values() {
        assert!(constant_time_compare(&[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5]));
    }

    #[test]
    fn constant_time_compare_different_values() {
        assert!(!constant_time_compare(&[1, 2, 3, 4, 5], &[1, 2, 3, 4, 6]));
    }

    #[test]
    fn constant_time_compare_different_lengths() {
        assert!(!constant_time_compare(&[1, 2, 3], &[1, 2, 3, 4]));
    }

    // ══════════════════════════════════════════════════════════════
    // Tamper Properties
    // ══════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn flipping_any_payload_byte_fails_verification(
            index in 0usize..CHECKOUT_PAYLOAD.len(),
            mask in 1u8..=255u8,
        ) {
            let verifier = StripeWebhookVerifier::new(TEST_SECRET);
            let header = signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW);
            let mut tampered = CHECKOUT_PAYLOAD.as_bytes().to_vec();
            tampered[index] ^= mask;

            let result = verifier.verify_at(&RawPayload::from(tampered), &header, NOW);

            prop_assert!(matches!(result, Err(WebhookError::InvalidSignature)));
        }

        #[test]
        fn flipping_any_signature_byte_fails_verification(
            index in 0usize..32,
            mask in 1u8..=255u8,
        ) {
            let verifier = StripeWebhookVerifier::new(TEST_SECRET);
            let header = SignatureHeader::parse(&signed(TEST_SECRET, CHECKOUT_PAYLOAD, NOW)).unwrap();
            let mut signature = header.v1_signatures[0].clone();
            signature[index] ^= mask;
            let tampered_header = format!("t={},v1={}", NOW, hex::encode(signature));

            let result = verifier.verify_at(&raw(CHECKOUT_PAYLOAD), &tampered_header, NOW);

            prop_assert!(matches!(result, Err(WebhookError::InvalidSignature)));
        }
    }
}
