//! HTTP client for the Admin API.
//!
//! This module provides the [`AdminClient`] type for making authenticated
//! requests against one shop's Admin API.

use tracing::debug;

use crate::auth::Session;
use crate::clients::customers::{Customer, CustomerEnvelope};
use crate::clients::error::ClientError;
use crate::config::AppConfig;

/// The header carrying the access credential on every Admin API call.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// An authenticated client for one shop's Admin API.
///
/// The client handles base-URL construction (`https://{shop}` or the
/// configured override), the versioned `/admin/api/{version}` path prefix,
/// and the access-token header. The underlying [`reqwest::Client`] is
/// shared and already carries the outbound timeout; cloning it is cheap.
///
/// # Example
///
/// ```rust,ignore
/// let client = AdminClient::for_session(&config, http.clone(), &session);
/// let customer = client.get_customer(2_560_413_401_165).await?;
/// println!("note: {:?}", customer.note);
/// ```
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    /// Versioned base, e.g. `https://my-store.myshopify.com/admin/api/2019-10`.
    api_base: String,
    access_token: String,
}

// Verify AdminClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AdminClient>();
};

impl AdminClient {
    /// Creates a client for the given session's shop.
    #[must_use]
    pub fn for_session(config: &AppConfig, http: reqwest::Client, session: &Session) -> Self {
        let api_base = format!(
            "{}/admin/api/{}",
            config.admin_base_url(&session.shop),
            config.api_version()
        );

        Self {
            http,
            api_base,
            access_token: session.access_token.clone(),
        }
    }

    /// Lists the shop's customers, returning the raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub async fn list_customers(&self) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/customers.json", self.api_base);
        debug!(%url, "listing customers");

        let response = self.get(&url).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Fetches one customer by id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub async fn get_customer(&self, id: u64) -> Result<Customer, ClientError> {
        let url = format!("{}/customers/{id}.json", self.api_base);
        debug!(%url, "fetching customer");

        let response = self.get(&url).await?;
        let envelope: CustomerEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(envelope.customer)
    }

    /// Updates one customer record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or non-success status.
    pub async fn update_customer(&self, customer: Customer) -> Result<(), ClientError> {
        let url = format!("{}/customers/{}.json", self.api_base, customer.id);
        debug!(%url, "updating customer");

        let response = self
            .http
            .put(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&CustomerEnvelope { customer })
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ClientError> {
        let response = self
            .http
            .get(url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::upstream(status.as_u16(), &body))
    }
}
