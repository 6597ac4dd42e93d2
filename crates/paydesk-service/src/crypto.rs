//! Cryptographic utilities for webhook verification.
//!
//! Razorpay signs each webhook body with HMAC-SHA256 keyed by the shared
//! webhook secret and sends the hex digest in `X-Razorpay-Signature`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute HMAC-SHA256 over `message` and return the hex-encoded digest.
///
/// # Panics
///
/// Never in practice: HMAC accepts keys of any length per RFC 2104.
#[must_use]
pub fn hmac_sha256_hex(secret: &str, message: &[u8]) -> String {
    // INVARIANT: `new_from_slice` only rejects keys for fixed-key MACs.
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC-SHA256 accepts any key size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Check a hex-encoded HMAC-SHA256 signature over the raw request body.
///
/// The digest comparison is constant-time. Signatures that are not valid hex
/// are rejected without computing anything.
#[must_use]
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature.trim()) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const BODY: &[u8] = br#"{"event":"payment.captured"}"#;

    #[test]
    fn hmac_sha256_produces_correct_length() {
        let result = hmac_sha256_hex("key", b"The quick brown fox jumps over the lazy dog");
        assert_eq!(result.len(), 64); // SHA256 = 32 bytes = 64 hex chars
        assert_eq!(
            result,
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn valid_signature_verifies() {
        let signature = hmac_sha256_hex(SECRET, BODY);
        assert!(verify_signature(SECRET, BODY, &signature));
        assert!(verify_signature(SECRET, BODY, &signature.to_uppercase()));
    }

    #[test]
    fn any_changed_body_byte_is_rejected() {
        let signature = hmac_sha256_hex(SECRET, BODY);
        for i in 0..BODY.len() {
            let mut tampered = BODY.to_vec();
            tampered[i] ^= 0x01;
            assert!(!verify_signature(SECRET, &tampered, &signature), "byte {i}");
        }
    }

    #[test]
    fn any_changed_signature_digit_is_rejected() {
        let signature = hmac_sha256_hex(SECRET, BODY);
        for i in 0..signature.len() {
            let mut chars: Vec<char> = signature.chars().collect();
            chars[i] = if chars[i] == '0' { '1' } else { '0' };
            let tampered: String = chars.into_iter().collect();
            assert!(!verify_signature(SECRET, BODY, &tampered), "digit {i}");
        }
    }

    #[test]
    fn wrong_secret_or_garbage_is_rejected() {
        let signature = hmac_sha256_hex("other-secret", BODY);
        assert!(!verify_signature(SECRET, BODY, &signature));
        assert!(!verify_signature(SECRET, BODY, "not-hex"));
        assert!(!verify_signature(SECRET, BODY, ""));
    }
}
