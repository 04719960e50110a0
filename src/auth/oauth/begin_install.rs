//! Authorization URL generation for the install flow.
//!
//! The first step of the OAuth flow: generate a fresh anti-forgery state
//! and build the authorization URL the merchant's browser is redirected
//! to. No network I/O happens here.

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::state::StateParam;
use crate::config::{AppConfig, ShopDomain};

/// The path on this app that receives the OAuth callback.
pub const CALLBACK_PATH: &str = "/shopify/callback";

/// Result of initiating an install.
///
/// Contains the authorization URL to redirect the merchant to, and the
/// state parameter that must travel alongside it as a browser cookie so
/// the callback handler can verify the round trip.
#[derive(Clone, Debug)]
pub struct InstallRedirect {
    /// The full authorization URL on the shop's domain.
    pub auth_url: String,

    /// The anti-forgery state generated for this install attempt.
    ///
    /// Set this as the `state` cookie; the callback compares the cookie
    /// against the echoed `state` query parameter.
    pub state: StateParam,
}

/// Builds the authorization redirect for one install attempt.
///
/// Generates a cryptographically unpredictable state token and constructs
/// `https://{shop}/admin/oauth/authorize` with `client_id`, `scope`,
/// `state`, and `redirect_uri` query parameters (keys and values
/// percent-encoded). The scopes are the fixed process-wide set from the
/// configuration; the redirect URI is the configured host plus
/// [`CALLBACK_PATH`].
///
/// # Errors
///
/// Returns [`OAuthError::MissingHostConfig`] if the configuration has no
/// host URL.
///
/// # Example
///
/// ```rust
/// use storecredit::auth::oauth::begin_install;
/// use storecredit::{ApiKey, ApiSecretKey, AppConfig, HostUrl, ShopDomain};
///
/// let config = AppConfig::builder()
///     .api_key(ApiKey::new("api-key").unwrap())
///     .api_secret_key(ApiSecretKey::new("secret").unwrap())
///     .host(HostUrl::new("https://myapp.example.com").unwrap())
///     .scopes("read_customers".parse().unwrap())
///     .build()
///     .unwrap();
///
/// let shop = ShopDomain::new("test-shop").unwrap();
/// let redirect = begin_install(&config, &shop).unwrap();
///
/// assert!(redirect
///     .auth_url
///     .starts_with("https://test-shop.myshopify.com/admin/oauth/authorize?"));
/// assert!(redirect.auth_url.contains("read_customers"));
/// ```
pub fn begin_install(
    config: &AppConfig,
    shop: &ShopDomain,
) -> Result<InstallRedirect, OAuthError> {
    let host = config.host().ok_or(OAuthError::MissingHostConfig)?;

    let state = StateParam::new();
    let redirect_uri = format!("{}{}", host.as_ref(), CALLBACK_PATH);

    let params = [
        ("client_id", config.api_key().as_ref().to_string()),
        ("scope", config.scopes().to_string()),
        ("state", state.to_string()),
        ("redirect_uri", redirect_uri),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let auth_url = format!(
        "https://{}/admin/oauth/authorize?{}",
        shop.as_ref(),
        query_string
    );

    Ok(InstallRedirect { auth_url, state })
}

// Verify InstallRedirect is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InstallRedirect>();
};
