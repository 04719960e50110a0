//! Error types for outbound Admin API calls.

use thiserror::Error;

/// Errors from server-to-server calls against the Admin API.
///
/// Upstream HTTP failures keep their status code so the inbound surface
/// can propagate it; transport failures are a distinct kind instead of
/// surfacing as a panic or a generic 500.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The upstream answered with a non-success status.
    #[error("Upstream request failed with status {status}: {message}")]
    Upstream {
        /// The HTTP status code returned.
        status: u16,
        /// The error description extracted from the response body.
        message: String,
    },

    /// The upstream could not be reached (DNS failure, connection refused,
    /// timeout).
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    /// The upstream answered 2xx but the body could not be decoded.
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

// Verify ClientError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientError>();
};

/// Fallback description when an upstream error body carries no message.
pub(crate) const UPSTREAM_FALLBACK_MESSAGE: &str = "upstream request failed";

/// Pulls a human-readable description out of an upstream error body.
///
/// Admin API errors arrive in a few shapes; the OAuth token endpoint uses
/// `error_description`, the REST API uses `errors` (string or object),
/// and some responses carry a bare `error`. Returns `None` when the body
/// is not JSON or has none of those fields — callers substitute a safe
/// fallback instead of crashing on a malformed body.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    for key in ["error_description", "errors", "error"] {
        match value.get(key) {
            Some(serde_json::Value::String(s)) => return Some(s.clone()),
            Some(other) if !other.is_null() => return Some(other.to_string()),
            _ => {}
        }
    }

    None
}

impl ClientError {
    /// Builds an [`ClientError::Upstream`] from a status and raw body.
    pub(crate) fn upstream(status: u16, body: &str) -> Self {
        Self::Upstream {
            status,
            message: extract_error_message(body)
                .unwrap_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string()),
        }
    }
}
