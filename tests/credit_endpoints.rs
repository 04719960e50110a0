//! Tests for the store-credit balance and discount-code endpoints.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header as header_match, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storecredit::auth::{MemoryStore, Session, SessionStore};
use storecredit::server::{build_router, AppState};
use storecredit::{ApiKey, ApiSecretKey, AppConfig, HostUrl, ShopDomain};

const CUSTOMER_ID: u64 = 2_560_413_401_165;
const SHOP: &str = "test-shop.myshopify.com";

/// App state with a credential already stored for [`SHOP`].
async fn installed_state(api_base: &str) -> AppState {
    let config = AppConfig::builder()
        .api_key(ApiKey::new("test-api-key").unwrap())
        .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
        .host(HostUrl::new("https://myapp.example.com").unwrap())
        .api_base(HostUrl::new(api_base).unwrap())
        .build()
        .unwrap();

    let store = Arc::new(MemoryStore::new());
    store
        .insert(Session::new(
            ShopDomain::new(SHOP).unwrap(),
            "tok123".to_string(),
            "read_customers,write_customers".parse().unwrap(),
        ))
        .await;

    AppState::new(config, store)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Mounts a customer-fetch mock returning the given note value.
async fn mock_customer(server: &MockServer, note: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/admin/api/2019-10/customers/{CUSTOMER_ID}.json")))
        .and(header_match("X-Shopify-Access-Token", "tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "customer": {
                "id": CUSTOMER_ID,
                "email": "merchant@example.com",
                "note": note
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn balance_returns_note_value() {
    let upstream = MockServer::start().await;
    mock_customer(&upstream, serde_json::json!("150")).await;

    let app = build_router(installed_state(&upstream.uri()).await);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/store_credit/user/{CUSTOMER_ID}/balance?shop={SHOP}&hmac=ff"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;

    // Pretty-printed with 3-space indentation
    assert!(body.contains("\n   \"customerId\""));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["customerId"], CUSTOMER_ID);
    assert_eq!(json["storeCreditBalance"], 150);
}

#[tokio::test]
async fn balance_defaults_when_note_is_not_numeric() {
    let upstream = MockServer::start().await;
    mock_customer(&upstream, serde_json::json!("prefers email contact")).await;

    let app = build_router(installed_state(&upstream.uri()).await);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/store_credit/user/{CUSTOMER_ID}/balance?shop={SHOP}&hmac=ff"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["storeCreditBalance"], 150);
}

#[tokio::test]
async fn balance_is_idempotent_without_writes() {
    let upstream = MockServer::start().await;
    mock_customer(&upstream, serde_json::json!("87.5")).await;

    let state = installed_state(&upstream.uri()).await;
    let mut bodies = Vec::new();
    for _ in 0..2 {
        let app = build_router(state.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/store_credit/user/{CUSTOMER_ID}/balance?shop={SHOP}&hmac=ff"
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        bodies.push(body_string(response).await);
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn balance_without_credential_returns_400() {
    // No session stored for this shop
    let config = AppConfig::builder()
        .api_key(ApiKey::new("test-api-key").unwrap())
        .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
        .build()
        .unwrap();
    let app = build_router(AppState::new(config, Arc::new(MemoryStore::new())));

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/store_credit/user/{CUSTOMER_ID}/balance?shop={SHOP}&hmac=ff"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(response).await,
        "Access token is missing. Please go to the app homepage"
    );
}

#[tokio::test]
async fn balance_without_hmac_param_returns_400() {
    let upstream = MockServer::start().await;
    let app = build_router(installed_state(&upstream.uri()).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/store_credit/user/{CUSTOMER_ID}/balance?shop={SHOP}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn discount_code_debits_balance_and_writes_note_back() {
    let upstream = MockServer::start().await;
    mock_customer(&upstream, serde_json::json!("150")).await;

    // 150 - (24 + 26) = 100 must be written back to the note
    Mock::given(method("PUT"))
        .and(path(format!("/admin/api/2019-10/customers/{CUSTOMER_ID}.json")))
        .and(header_match("X-Shopify-Access-Token", "tok123"))
        .and(body_partial_json(serde_json::json!({
            "customer": {"id": CUSTOMER_ID, "note": "100"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "customer": {"id": CUSTOMER_ID}
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = build_router(installed_state(&upstream.uri()).await);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/store_credit/user/{CUSTOMER_ID}/discount_code?shop={SHOP}&hmac=ff&item_ids=24,26"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("\n   \"discountCode\""));

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["discountAmount"], 50);

    let code = json["discountCode"].as_u64().unwrap();
    assert!((100_000..=999_999).contains(&code), "code was {code}");
}

#[tokio::test]
async fn discount_code_clamps_balance_at_zero_on_underflow() {
    let upstream = MockServer::start().await;
    mock_customer(&upstream, serde_json::json!("10")).await;

    Mock::given(method("PUT"))
        .and(path(format!("/admin/api/2019-10/customers/{CUSTOMER_ID}.json")))
        .and(body_partial_json(serde_json::json!({
            "customer": {"note": "0"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "customer": {"id": CUSTOMER_ID}
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = build_router(installed_state(&upstream.uri()).await);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/store_credit/user/{CUSTOMER_ID}/discount_code?shop={SHOP}&hmac=ff&item_ids=30"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["discountAmount"], 30);
}

#[tokio::test]
async fn discount_code_without_item_ids_debits_nothing() {
    let upstream = MockServer::start().await;
    mock_customer(&upstream, serde_json::json!("150")).await;

    Mock::given(method("PUT"))
        .and(path(format!("/admin/api/2019-10/customers/{CUSTOMER_ID}.json")))
        .and(body_partial_json(serde_json::json!({
            "customer": {"note": "150"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "customer": {"id": CUSTOMER_ID}
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = build_router(installed_state(&upstream.uri()).await);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/store_credit/user/{CUSTOMER_ID}/discount_code?shop={SHOP}&hmac=ff"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["discountAmount"], 0);
}

#[tokio::test]
async fn upstream_customer_failure_propagates_status() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/admin/api/2019-10/customers/{CUSTOMER_ID}.json")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"errors": "Not Found"})),
        )
        .mount(&upstream)
        .await;

    let app = build_router(installed_state(&upstream.uri()).await);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/store_credit/user/{CUSTOMER_ID}/balance?shop={SHOP}&hmac=ff"
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Not Found");
}
