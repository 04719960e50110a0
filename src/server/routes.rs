//! Request handlers for the inbound HTTP surface.

use std::collections::HashMap;

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::info;

use crate::auth::oauth::{authenticate_callback, begin_install, CallbackParams};
use crate::auth::{Session, SessionStore as _};
use crate::clients::Customer;
use crate::config::ShopDomain;
use crate::credit::{
    apply_discount, balance_to_json, discount_amount, format_balance, generate_discount_code,
    parse_balance,
};
use crate::server::error::ApiError;
use crate::server::{pretty_json, AppState};

/// Name of the cookie carrying the anti-forgery state between the install
/// redirect and the callback.
const STATE_COOKIE: &str = "state";

/// `GET /shopify?shop=<domain>` — the install initiator.
///
/// Redirects the merchant's browser to the shop's authorization endpoint
/// and sets the `state` cookie that the callback will verify. No network
/// I/O happens here.
pub async fn install(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let shop = query
        .get("shop")
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingShopParam)?;
    let shop = ShopDomain::new(shop).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let redirect = begin_install(state.config(), &shop)?;
    info!(shop = %shop, "redirecting to authorization endpoint");

    let jar = jar.add(Cookie::new(STATE_COOKIE, redirect.state.to_string()));
    Ok((
        jar,
        (
            StatusCode::FOUND,
            [(header::LOCATION, redirect.auth_url)],
        ),
    )
        .into_response())
}

/// `GET /shopify/callback` — the callback authenticator.
///
/// Verifies the callback (state, presence, HMAC), exchanges the code for
/// an access token, stores the session under the shop domain, then makes
/// one customer-listing call as a smoke test and returns its payload.
pub async fn oauth_callback(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let params = CallbackParams::parse(raw_query.as_deref().unwrap_or(""));
    let cookie_state = jar.get(STATE_COOKIE).map(Cookie::value_trimmed);

    let session =
        authenticate_callback(state.config(), state.http(), &params, cookie_state).await?;
    info!(shop = %session.shop, "install complete");

    let client = state.admin_client(&session);
    state.store().insert(session).await;

    let customers = client.list_customers().await?;
    Ok(pretty_json(StatusCode::OK, &customers))
}

/// `GET /store_credit/user/:id/balance?shop=&hmac=`
///
/// Reads the customer's store-credit balance out of the note field.
/// Repeated calls without intervening writes return the same balance.
pub async fn credit_balance(
    State(state): State<AppState>,
    Path(customer_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let session = authorize_business_call(&state, &query).await?;

    let client = state.admin_client(&session);
    let customer = client.get_customer(customer_id).await?;
    let balance = parse_balance(customer.note.as_deref());

    let body = serde_json::json!({
        "customerId": customer.id,
        "storeCreditBalance": balance_to_json(balance),
    });
    Ok(pretty_json(StatusCode::OK, &body))
}

/// `GET /store_credit/user/:id/discount_code?shop=&hmac=&item_ids=24,26`
///
/// Computes a discount from the `item_ids` sum, decrements the stored
/// balance (clamped at zero), writes the new balance back to the note
/// field, and returns a fresh 6-digit discount code.
pub async fn discount_code(
    State(state): State<AppState>,
    Path(customer_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let session = authorize_business_call(&state, &query).await?;

    let client = state.admin_client(&session);
    let customer = client.get_customer(customer_id).await?;

    let balance = parse_balance(customer.note.as_deref());
    let amount = discount_amount(query.get("item_ids").map(String::as_str));
    let new_balance = apply_discount(balance, amount);

    client
        .update_customer(Customer {
            id: customer.id,
            email: customer.email,
            note: Some(format_balance(new_balance)),
        })
        .await?;
    info!(customer_id, amount, new_balance, "store credit debited");

    let body = serde_json::json!({
        "discountCode": generate_discount_code(),
        "discountAmount": balance_to_json(amount),
    });
    Ok(pretty_json(StatusCode::OK, &body))
}

/// Gate shared by the business endpoints: `shop` and `hmac` must be
/// present and an access credential must be stored for that shop.
async fn authorize_business_call(
    state: &AppState,
    query: &HashMap<String, String>,
) -> Result<Session, ApiError> {
    let (Some(shop), Some(_hmac)) = (
        query.get("shop").filter(|s| !s.is_empty()),
        query.get("hmac").filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::CredentialMissing);
    };

    let shop = ShopDomain::new(shop).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .store()
        .get(&shop)
        .await
        .ok_or(ApiError::CredentialMissing)
}
