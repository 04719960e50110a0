//! OAuth 2.0 authorization-code flow for the install handshake.
//!
//! Installing the app on a shop is a three-step protocol:
//!
//! 1. **Install initiation** ([`begin_install`]): generate an anti-forgery
//!    state token and an authorization URL on the shop's domain, and
//!    redirect the merchant there (the state also travels as a cookie).
//!
//! 2. **Callback authentication** ([`authenticate_callback`]): when the
//!    merchant is redirected back, verify the state echo, the presence of
//!    the required parameters, and the HMAC signature — then exchange the
//!    authorization code for an access token.
//!
//! 3. The resulting [`Session`](crate::auth::Session) authorizes Admin API
//!    calls for that shop.
//!
//! # Security Features
//!
//! - **HMAC validation**: every callback is verified with HMAC-SHA256
//!   using the app secret as the key
//! - **CSRF protection**: the single-use state parameter binds a callback
//!   to the install attempt that issued it
//! - **Constant-time comparison**: digest and state comparisons never
//!   leak match length through timing
//!
//! # Example
//!
//! ```rust,ignore
//! use storecredit::auth::oauth::{authenticate_callback, begin_install, CallbackParams};
//!
//! // Step 1: build the redirect, set `redirect.state` as a cookie
//! let redirect = begin_install(&config, &shop)?;
//!
//! // Step 2: in the callback handler
//! let params = CallbackParams::parse(raw_query);
//! let session = authenticate_callback(&config, &http, &params, cookie_state).await?;
//! store.insert(session).await;
//! ```

mod authenticate;
mod begin_install;
mod callback;
mod error;
pub mod hmac;
mod state;

pub use authenticate::authenticate_callback;
pub use begin_install::{begin_install, InstallRedirect, CALLBACK_PATH};
pub use callback::CallbackParams;
pub use error::OAuthError;
pub use hmac::{compute_signature, constant_time_compare, validate_hmac};
pub use state::StateParam;
