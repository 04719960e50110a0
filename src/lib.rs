//! # Store-credit app for Shopify
//!
//! A small HTTP service bridging Shopify's app-installation flow with two
//! store-credit endpoints. It provides:
//!
//! - The OAuth authorization-code handshake via [`auth::oauth`]:
//!   install redirect with anti-forgery state, callback verification
//!   (state echo + HMAC-SHA256 with constant-time comparison), and
//!   authorization-code exchange
//! - Per-shop session storage via [`auth::SessionStore`], so concurrent
//!   installs from different shops never clobber each other
//! - An authenticated Admin API client via [`clients::AdminClient`] with
//!   explicit timeouts on every outbound call
//! - Store-credit arithmetic via [`credit`]: balances kept in the customer
//!   note field, discount amounts summed from `item_ids`, decrements
//!   clamped at zero
//! - The inbound HTTP surface via [`server`]
//!
//! ## Inbound surface
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `GET /shopify?shop=` | 302 redirect to the shop's authorization URL, sets the `state` cookie |
//! | `GET /shopify/callback` | verifies the callback, exchanges the code, returns the customer list |
//! | `GET /store_credit/user/:id/balance` | `{customerId, storeCreditBalance}` |
//! | `GET /store_credit/user/:id/discount_code` | debits the balance, returns `{discountCode, discountAmount}` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storecredit::auth::MemoryStore;
//! use storecredit::server::{self, AppState};
//! use storecredit::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let state = AppState::new(config, Arc::new(MemoryStore::new()));
//!     server::run(state).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and sessions are instance-based
//!   and passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all shared types are `Send + Sync`
//! - **Async-first**: designed for the Tokio runtime
//! - **Terminal failures**: every request-level failure maps to one
//!   response; no retries, no partial state

pub mod auth;
pub mod clients;
pub mod config;
pub mod credit;
pub mod error;
pub mod server;

// Re-export public types at crate root for convenience
pub use auth::{AuthScopes, Session};
pub use config::{
    ApiKey, ApiSecretKey, ApiVersion, AppConfig, AppConfigBuilder, HostUrl, ShopDomain,
};
pub use error::ConfigError;
