//! HMAC validation for OAuth callbacks.
//!
//! Shopify signs every callback with HMAC-SHA256 over the query string
//! (minus the signature parameters) using the app's API secret as the key.
//! This module computes that signature and compares it against the one the
//! request carries.
//!
//! # Security
//!
//! All comparisons are constant-time to prevent timing side-channels. A
//! length mismatch between digests is a verification failure, never an
//! error or a panic.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::auth::oauth::CallbackParams;
use crate::config::ApiSecretKey;

type HmacSha256 = Hmac<Sha256>;

/// Computes an HMAC-SHA256 signature for the given message.
///
/// The signature is returned as a lowercase hexadecimal string, the format
/// Shopify uses for the `hmac` query parameter.
///
/// # Note
///
/// This function uses `expect()` internally but this will never panic
/// because HMAC-SHA256 accepts keys of any length.
///
/// # Example
///
/// ```rust
/// use storecredit::auth::oauth::compute_signature;
///
/// let sig = compute_signature("code=abc&shop=x.myshopify.com&state=n", "secret-key");
/// assert_eq!(sig.len(), 64); // SHA256 produces 32 bytes = 64 hex chars
/// assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
/// ```
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

/// Performs constant-time comparison of two strings.
///
/// Used for HMAC digests and state tokens, where an early-exit comparison
/// would leak how many leading bytes matched.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    // ConstantTimeEq handles different lengths securely
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Validates the HMAC signature of an OAuth callback.
///
/// Reconstructs the signable string from the callback parameters (all
/// pairs except `hmac` and `signature`, in wire order), computes the
/// expected digest with the app secret, and compares it against the
/// supplied `hmac` parameter in constant time.
///
/// Returns `false` when the `hmac` parameter is absent.
#[must_use]
pub fn validate_hmac(params: &CallbackParams, secret: &ApiSecretKey) -> bool {
    let Some(received) = params.hmac() else {
        return false;
    };

    let computed = compute_signature(&params.to_signable_string(), secret.as_ref());
    constant_time_compare(&computed, received)
}

// Internal hex encoding since we don't want to add another dependency
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut result = String::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            result.push(HEX_CHARS[(byte >> 4) as usize] as char);
            result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> ApiSecretKey {
        ApiSecretKey::new(value).unwrap()
    }

    #[test]
    fn test_compute_signature_produces_lowercase_hex() {
        let sig = compute_signature("test", "secret");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(sig.chars().all(|c| !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_compute_signature_matches_known_value() {
        // HMAC-SHA256("message", "key")
        let sig = compute_signature("message", "key");
        assert_eq!(
            sig,
            "6e9ef29b75fffc5b7abae527d58fdadb2fe42e7219011976917343065f58ed4a"
        );
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(!constant_time_compare("ABC", "abc"));
    }

    #[test]
    fn test_validate_hmac_accepts_correct_signature() {
        let query = "code=auth-code&shop=test-shop.myshopify.com&state=nonce";
        let sig = compute_signature(query, "test-secret");
        let params = CallbackParams::parse(&format!("{query}&hmac={sig}"));

        assert!(validate_hmac(&params, &secret("test-secret")));
    }

    #[test]
    fn test_validate_hmac_rejects_single_bit_flip() {
        let query = "code=auth-code&shop=test-shop.myshopify.com&state=nonce";
        let mut sig = compute_signature(query, "test-secret");

        // Flip the last hex digit
        let last = sig.pop().unwrap();
        sig.push(if last == '0' { '1' } else { '0' });
        let params = CallbackParams::parse(&format!("{query}&hmac={sig}"));

        assert!(!validate_hmac(&params, &secret("test-secret")));
    }

    #[test]
    fn test_validate_hmac_rejects_wrong_secret() {
        let query = "code=c&shop=s.myshopify.com&state=n";
        let sig = compute_signature(query, "other-secret");
        let params = CallbackParams::parse(&format!("{query}&hmac={sig}"));

        assert!(!validate_hmac(&params, &secret("test-secret")));
    }

    #[test]
    fn test_validate_hmac_rejects_truncated_digest() {
        let query = "code=c&shop=s.myshopify.com&state=n";
        let sig = compute_signature(query, "test-secret");
        let params = CallbackParams::parse(&format!("{query}&hmac={}", &sig[..16]));

        assert!(!validate_hmac(&params, &secret("test-secret")));
    }

    #[test]
    fn test_validate_hmac_rejects_missing_hmac() {
        let params = CallbackParams::parse("code=c&shop=s.myshopify.com&state=n");
        assert!(!validate_hmac(&params, &secret("test-secret")));
    }

    #[test]
    fn test_validate_hmac_ignores_signature_key() {
        // The legacy `signature` parameter is excluded from the signable
        // string just like `hmac` itself
        let query = "code=c&shop=s.myshopify.com&state=n";
        let sig = compute_signature(query, "test-secret");
        let params =
            CallbackParams::parse(&format!("code=c&shop=s.myshopify.com&signature=legacy&state=n&hmac={sig}"));

        assert!(validate_hmac(&params, &secret("test-secret")));
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(hex::encode([0x00, 0xff, 0xab, 0xcd]), "00ffabcd");
        assert_eq!(hex::encode([]), "");
    }
}
