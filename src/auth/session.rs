//! Session management for authenticated Admin API calls.
//!
//! This module provides the [`Session`] type representing one shop's
//! access credential, and the [`AccessTokenResponse`] payload returned by
//! the token-exchange endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthScopes;
use crate::config::ShopDomain;

/// The JSON body returned by `POST /admin/oauth/access_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    /// The long-lived bearer credential.
    pub access_token: String,
    /// The scopes actually granted, comma-separated.
    #[serde(default)]
    pub scope: Option<AuthScopes>,
}

/// An authenticated session for one shop.
///
/// A session is created when a callback's authorization code is exchanged
/// for an access token, and authorizes Admin API calls on behalf of that
/// shop until the app is uninstalled. Sessions are immutable after
/// creation; a re-install replaces the stored session wholesale.
///
/// # Example
///
/// ```rust
/// use storecredit::{Session, ShopDomain};
///
/// let session = Session::new(
///     ShopDomain::new("my-store").unwrap(),
///     "access-token".to_string(),
///     "read_customers".parse().unwrap(),
/// );
///
/// assert!(session.is_active());
/// assert_eq!(session.shop.as_ref(), "my-store.myshopify.com");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// The shop this session is for.
    pub shop: ShopDomain,

    /// The access token for Admin API authentication.
    pub access_token: String,

    /// The OAuth scopes granted to this session.
    pub scopes: AuthScopes,

    /// When the token exchange that produced this session completed.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session with the specified parameters.
    #[must_use]
    pub fn new(shop: ShopDomain, access_token: String, scopes: AuthScopes) -> Self {
        Self {
            shop,
            access_token,
            scopes,
            created_at: Utc::now(),
        }
    }

    /// Builds a session from a token-exchange response.
    #[must_use]
    pub fn from_token_response(shop: ShopDomain, response: AccessTokenResponse) -> Self {
        Self::new(
            shop,
            response.access_token,
            response.scope.unwrap_or_default(),
        )
    }

    /// Returns `true` if this session holds a usable access token.
    ///
    /// Offline tokens do not expire; a session is inactive only when the
    /// token is empty.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.access_token.is_empty()
    }
}

// Verify Session is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Session>();
};
