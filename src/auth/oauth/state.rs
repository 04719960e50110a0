//! State parameter handling for OAuth CSRF protection.
//!
//! The state parameter binds an install redirect to its callback: the
//! value sent to Shopify in the authorization URL must come back unchanged
//! in the callback, and must match the copy kept in the browser cookie.
//! It is generated fresh per install attempt and compared exactly once.

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

/// A single-use anti-forgery token for the OAuth flow.
///
/// # Example
///
/// ```rust
/// use storecredit::auth::oauth::StateParam;
///
/// let state = StateParam::new();
/// assert_eq!(state.as_ref().len(), 15);
/// assert!(state.as_ref().chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateParam(String);

// Verify StateParam is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateParam>();
};

impl StateParam {
    /// The length of generated nonces.
    const NONCE_LENGTH: usize = 15;

    /// Creates a new state parameter with a cryptographically secure
    /// random nonce.
    ///
    /// The nonce is a 15-character alphanumeric string drawn from
    /// [`rand::thread_rng`], which is a CSPRNG.
    #[must_use]
    pub fn new() -> Self {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::NONCE_LENGTH)
            .map(char::from)
            .collect();

        Self(nonce)
    }

    /// Wraps an existing state value without any processing.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
