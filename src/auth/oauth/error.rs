//! OAuth-specific error types.
//!
//! This module contains error types for the install flow: state
//! verification, HMAC validation, and token-exchange failures.

use thiserror::Error;

/// Errors that can occur during the OAuth install flow.
///
/// Every failure is terminal for the request that triggered it; there are
/// no retries. The server layer maps each variant to the HTTP status and
/// body the flow documents.
///
/// # Thread Safety
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async
/// boundaries.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// HMAC signature validation failed.
    ///
    /// The callback's `hmac` parameter does not match the digest computed
    /// with the API secret key. The request did not come from Shopify, or
    /// the secret is misconfigured.
    #[error("HMAC validation failed")]
    InvalidHmac,

    /// The callback's `state` parameter does not match the value issued at
    /// install initiation (or one of the two is missing). This is the
    /// CSRF defense for the install flow.
    #[error("Request origin cannot be verified")]
    StateMismatch,

    /// One or more of the required callback parameters (`shop`, `hmac`,
    /// `code`) is missing.
    #[error("Callback is missing required parameters")]
    MissingParams,

    /// Callback parameters are present but malformed.
    #[error("Invalid callback: {reason}")]
    InvalidCallback {
        /// Description of what's invalid about the callback.
        reason: String,
    },

    /// The token-exchange request was answered with a non-success status.
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchangeFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The error description extracted from the response body.
        message: String,
    },

    /// The token endpoint could not be reached at all (DNS failure,
    /// connection refused, timeout).
    #[error("Token endpoint unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Host URL is not configured.
    ///
    /// Building the authorization URL requires the app's public host to
    /// construct the `redirect_uri`. Configure it via `APP_HOST` or
    /// `AppConfigBuilder::host()`.
    #[error("Host URL must be configured for OAuth")]
    MissingHostConfig,
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_hmac_message_matches_response_body() {
        assert_eq!(OAuthError::InvalidHmac.to_string(), "HMAC validation failed");
    }

    #[test]
    fn test_state_mismatch_message_matches_response_body() {
        assert_eq!(
            OAuthError::StateMismatch.to_string(),
            "Request origin cannot be verified"
        );
    }

    #[test]
    fn test_token_exchange_failed_includes_status_and_message() {
        let error = OAuthError::TokenExchangeFailed {
            status: 401,
            message: "Invalid client credentials".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Invalid client credentials"));
    }

    #[test]
    fn test_oauth_error_implements_std_error() {
        let error: &dyn std::error::Error = &OAuthError::InvalidHmac;
        let _ = error;
    }
}
