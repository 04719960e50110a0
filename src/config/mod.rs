//! Configuration types for the store-credit app.
//!
//! This module provides the core configuration types used to initialize
//! the app for OAuth handshakes and Admin API communication.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`AppConfig`]: The main configuration struct holding all app settings
//! - [`AppConfigBuilder`]: A builder for constructing [`AppConfig`] instances
//! - [`ApiKey`]: A validated API key newtype
//! - [`ApiSecretKey`]: A validated API secret key newtype with masked debug output
//! - [`ShopDomain`]: A validated Shopify shop domain
//! - [`HostUrl`]: A validated application host URL
//! - [`ApiVersion`]: The Shopify Admin API version to use
//!
//! Configuration is environment-supplied in production ([`AppConfig::from_env`])
//! and builder-supplied in tests.
//!
//! # Example
//!
//! ```rust
//! use storecredit::{AppConfig, ApiKey, ApiSecretKey, HostUrl};
//!
//! let config = AppConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .host(HostUrl::new("https://myapp.example.com").unwrap())
//!     .scopes("read_products,read_customers,write_customers".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_key().as_ref(), "my-api-key");
//! ```

mod newtypes;
mod version;

pub use newtypes::{ApiKey, ApiSecretKey, HostUrl, ShopDomain};
pub use version::ApiVersion;

use std::net::SocketAddr;
use std::time::Duration;

use crate::auth::AuthScopes;
use crate::error::ConfigError;

/// Default listen address when `BIND_ADDR` is not set.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default timeout for outbound calls when `UPSTREAM_TIMEOUT_SECS` is not set.
const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Default permission scopes requested at install time.
const DEFAULT_SCOPES: &str = "read_products,read_customers,write_customers";

/// Configuration for the store-credit app.
///
/// Holds the app credentials, requested OAuth scopes, the externally
/// reachable host for the callback redirect, and outbound-call settings.
///
/// # Thread Safety
///
/// `AppConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct AppConfig {
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    scopes: AuthScopes,
    host: Option<HostUrl>,
    api_version: ApiVersion,
    api_base: Option<HostUrl>,
    upstream_timeout: Duration,
    bind_addr: SocketAddr,
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Loads the configuration from the process environment.
    ///
    /// Call [`dotenvy::dotenv`] first if `.env` support is wanted; this
    /// function reads the environment only.
    ///
    /// | Variable                | Meaning                            | Default |
    /// |-------------------------|------------------------------------|---------|
    /// | `SHOPIFY_API_KEY`       | app client id                      | required |
    /// | `SHOPIFY_API_SECRET`    | app client secret                  | required |
    /// | `APP_HOST`              | public base URL for the callback   | required |
    /// | `SHOPIFY_SCOPES`        | requested permission scopes        | `read_products,read_customers,write_customers` |
    /// | `SHOPIFY_API_VERSION`   | Admin API version                  | `2019-10` |
    /// | `BIND_ADDR`             | listen address                     | `0.0.0.0:3000` |
    /// | `UPSTREAM_TIMEOUT_SECS` | outbound call timeout in seconds   | `10` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] for absent required variables
    /// and [`ConfigError::InvalidEnvVar`] (or the underlying validation
    /// error) for unparseable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let require = |name: &'static str| {
            std::env::var(name).map_err(|_| ConfigError::MissingEnvVar { name })
        };

        let api_key = ApiKey::new(require("SHOPIFY_API_KEY")?)?;
        let api_secret_key = ApiSecretKey::new(require("SHOPIFY_API_SECRET")?)?;
        let host = HostUrl::new(require("APP_HOST")?)?;

        let scopes: AuthScopes = std::env::var("SHOPIFY_SCOPES")
            .unwrap_or_else(|_| DEFAULT_SCOPES.to_string())
            .parse()?;

        let api_version = match std::env::var("SHOPIFY_API_VERSION") {
            Ok(raw) => raw.parse()?,
            Err(_) => ApiVersion::default(),
        };

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidEnvVar {
                name: "BIND_ADDR",
                reason: format!("{e}"),
            })?;

        let upstream_timeout = match std::env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    name: "UPSTREAM_TIMEOUT_SECS",
                    reason: format!("{e}"),
                })?,
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT,
        };

        Self::builder()
            .api_key(api_key)
            .api_secret_key(api_secret_key)
            .host(host)
            .scopes(scopes)
            .api_version(api_version)
            .bind_addr(bind_addr)
            .upstream_timeout(upstream_timeout)
            .build()
    }

    /// Returns the API key (client id).
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key (client secret).
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the requested OAuth scopes.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the public host URL, if configured.
    #[must_use]
    pub const fn host(&self) -> Option<&HostUrl> {
        self.host.as_ref()
    }

    /// Returns the pinned Admin API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the timeout applied to outbound calls.
    #[must_use]
    pub const fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }

    /// Returns the address the HTTP server binds to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Returns the base URL for server-to-server calls to the given shop.
    ///
    /// Normally `https://{shop}`; when an `api_base` override is configured
    /// (local mock, proxy), that URL is used instead for every shop.
    #[must_use]
    pub fn admin_base_url(&self, shop: &ShopDomain) -> String {
        self.api_base.as_ref().map_or_else(
            || format!("https://{}", shop.as_ref()),
            |base| base.as_ref().to_string(),
        )
    }
}

// Verify AppConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppConfig>();
};

/// Builder for constructing [`AppConfig`] instances.
///
/// Required fields are `api_key` and `api_secret_key`. All other fields
/// have defaults matching [`AppConfig::from_env`].
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    scopes: Option<AuthScopes>,
    host: Option<HostUrl>,
    api_version: Option<ApiVersion>,
    api_base: Option<HostUrl>,
    upstream_timeout: Option<Duration>,
    bind_addr: Option<SocketAddr>,
}

impl AppConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (required).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the requested OAuth scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the public host URL used to build the callback `redirect_uri`.
    #[must_use]
    pub fn host(mut self, host: HostUrl) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the Admin API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Overrides the outbound base URL for every shop.
    ///
    /// Used to point token exchange and Admin API calls at a local mock
    /// server or proxy instead of `https://{shop}`.
    #[must_use]
    pub fn api_base(mut self, base: HostUrl) -> Self {
        self.api_base = Some(base);
        self
    }

    /// Sets the outbound call timeout.
    #[must_use]
    pub const fn upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = Some(timeout);
        self
    }

    /// Sets the HTTP server listen address.
    #[must_use]
    pub const fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` or
    /// `api_secret_key` is not set.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self.api_secret_key.ok_or(ConfigError::MissingRequiredField {
            field: "api_secret_key",
        })?;

        let bind_addr = match self.bind_addr {
            Some(addr) => addr,
            // DEFAULT_BIND_ADDR is a valid socket address literal
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    name: "BIND_ADDR",
                    reason: format!("{e}"),
                })?,
        };

        Ok(AppConfig {
            api_key,
            api_secret_key,
            scopes: self.scopes.unwrap_or_default(),
            host: self.host,
            api_version: self.api_version.unwrap_or_default(),
            api_base: self.api_base,
            upstream_timeout: self.upstream_timeout.unwrap_or(DEFAULT_UPSTREAM_TIMEOUT),
            bind_addr,
        })
    }
}
