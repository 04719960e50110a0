//! Callback authentication and token exchange.
//!
//! The second step of the OAuth flow: when Shopify redirects the merchant
//! back, verify that the callback is genuine (state, presence, HMAC — in
//! that order) and exchange the authorization code for an access token.
//!
//! The checks short-circuit: the first failure terminates the request, and
//! nothing from a failed callback is retained. Every callback re-derives
//! its state from the query string and the cookie.

use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::hmac::{constant_time_compare, validate_hmac};
use crate::auth::oauth::CallbackParams;
use crate::auth::{AccessTokenResponse, Session};
use crate::clients::extract_error_message;
use crate::config::{AppConfig, ShopDomain};

/// Request body for the token exchange.
#[derive(Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// Fallback description when an upstream error body is absent or malformed.
const EXCHANGE_FALLBACK_MESSAGE: &str = "token exchange rejected by upstream";

/// Authenticates an OAuth callback and exchanges its code for a session.
///
/// Performs the full callback validation flow:
///
/// 1. **State check** — the `state` query parameter must equal the value
///    from the `state` cookie (constant-time comparison). A missing cookie
///    or parameter fails the check.
/// 2. **Presence check** — `shop`, `hmac`, and `code` must all be present.
/// 3. **HMAC verification** — the callback signature must match the digest
///    computed with the API secret key.
/// 4. **Token exchange** — POST to the shop's token endpoint with
///    `{client_id, client_secret, code}` and build a [`Session`] from the
///    response.
///
/// # Arguments
///
/// * `config` - App configuration (credentials, API base)
/// * `http` - Shared HTTP client, already carrying the outbound timeout
/// * `params` - The callback query parameters, in wire order
/// * `cookie_state` - The `state` cookie value, if the browser sent one
///
/// # Errors
///
/// - [`OAuthError::StateMismatch`] — CSRF check failed
/// - [`OAuthError::MissingParams`] — `shop`, `hmac`, or `code` absent
/// - [`OAuthError::InvalidHmac`] — signature verification failed
/// - [`OAuthError::InvalidCallback`] — shop domain is malformed
/// - [`OAuthError::TokenExchangeFailed`] — upstream rejected the exchange
/// - [`OAuthError::UpstreamUnreachable`] — token endpoint unreachable
pub async fn authenticate_callback(
    config: &AppConfig,
    http: &reqwest::Client,
    params: &CallbackParams,
    cookie_state: Option<&str>,
) -> Result<Session, OAuthError> {
    // Step 1: anti-forgery state check
    let state_ok = match (params.state(), cookie_state) {
        (Some(echoed), Some(issued)) => constant_time_compare(echoed, issued),
        _ => false,
    };
    if !state_ok {
        warn!("callback state does not match issued state");
        return Err(OAuthError::StateMismatch);
    }

    // Step 2: required parameters
    let (Some(shop), Some(_), Some(code)) = (params.shop(), params.hmac(), params.code()) else {
        return Err(OAuthError::MissingParams);
    };

    // Step 3: HMAC verification
    if !validate_hmac(params, config.api_secret_key()) {
        warn!(shop, "callback failed HMAC validation");
        return Err(OAuthError::InvalidHmac);
    }

    let shop = ShopDomain::new(shop).map_err(|_| OAuthError::InvalidCallback {
        reason: format!("Invalid shop domain: {}", params.shop().unwrap_or_default()),
    })?;

    // Step 4: exchange the single-use code for an access token
    let session = exchange_code(config, http, &shop, code).await?;
    debug!(shop = %session.shop, "token exchange complete");

    Ok(session)
}

/// POSTs the authorization code to the shop's token endpoint.
async fn exchange_code(
    config: &AppConfig,
    http: &reqwest::Client,
    shop: &ShopDomain,
    code: &str,
) -> Result<Session, OAuthError> {
    let token_url = format!("{}/admin/oauth/access_token", config.admin_base_url(shop));

    let request_body = TokenExchangeRequest {
        client_id: config.api_key().as_ref(),
        client_secret: config.api_secret_key().as_ref(),
        code,
    };

    let response = http
        .post(&token_url)
        .json(&request_body)
        .send()
        .await
        .map_err(|e| OAuthError::UpstreamUnreachable(e.to_string()))?;

    let status = response.status().as_u16();

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| EXCHANGE_FALLBACK_MESSAGE.to_string());
        return Err(OAuthError::TokenExchangeFailed { status, message });
    }

    let token_response: AccessTokenResponse =
        response
            .json()
            .await
            .map_err(|e| OAuthError::TokenExchangeFailed {
                status,
                message: format!("failed to parse token response: {e}"),
            })?;

    Ok(Session::from_token_response(shop.clone(), token_response))
}
