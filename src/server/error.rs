//! Error-to-response mapping for the inbound HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::oauth::OAuthError;
use crate::clients::ClientError;

/// Message sent when the install initiator is called without a shop.
pub const MISSING_SHOP_MESSAGE: &str =
    "Missing shop parameter. Please add ?shop=your-development-shop.myshopify.com to your request";

/// Message sent when no access credential is available for the request.
pub const CREDENTIAL_MISSING_MESSAGE: &str =
    "Access token is missing. Please go to the app homepage";

/// Failures of the inbound HTTP surface.
///
/// Each variant corresponds to one terminal per-request outcome; there is
/// no retry or backoff anywhere. Upstream failures keep the upstream's
/// status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The install initiator was called without a `shop` parameter.
    #[error("Missing shop parameter. Please add ?shop=your-development-shop.myshopify.com to your request")]
    MissingShopParam,

    /// A business endpoint was called without the parameters or stored
    /// credential it needs.
    #[error("Access token is missing. Please go to the app homepage")]
    CredentialMissing,

    /// The callback's anti-forgery state did not match the cookie.
    #[error("Request origin cannot be verified")]
    OriginNotVerified,

    /// The callback's HMAC signature did not verify.
    #[error("HMAC validation failed")]
    HmacInvalid,

    /// A parameter was present but malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The upstream API answered with a failure status.
    #[error("{message}")]
    Upstream {
        /// The upstream's status code, propagated as ours.
        status: u16,
        /// The description extracted from the upstream body.
        message: String,
    },

    /// The upstream API could not be reached.
    #[error("Upstream API unreachable: {0}")]
    UpstreamUnreachable(String),

    /// A server-side invariant failed (misconfiguration, undecodable
    /// upstream payload).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingShopParam
            | Self::CredentialMissing
            | Self::HmacInvalid
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::OriginNotVerified => StatusCode::FORBIDDEN,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.to_string();

        if status.is_server_error() {
            error!(%status, %body, "request failed");
        } else {
            warn!(%status, %body, "request rejected");
        }

        (status, body).into_response()
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::InvalidHmac => Self::HmacInvalid,
            OAuthError::StateMismatch => Self::OriginNotVerified,
            // The reference flow points callers with an incomplete
            // callback back at the app homepage
            OAuthError::MissingParams => Self::CredentialMissing,
            OAuthError::InvalidCallback { reason } => Self::BadRequest(reason),
            OAuthError::TokenExchangeFailed { status, message } => {
                Self::Upstream { status, message }
            }
            OAuthError::UpstreamUnreachable(message) => Self::UpstreamUnreachable(message),
            OAuthError::MissingHostConfig => Self::Internal(err.to_string()),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Upstream { status, message } => Self::Upstream { status, message },
            ClientError::Unreachable(message) => Self::UpstreamUnreachable(message),
            ClientError::Decode(message) => Self::Internal(message),
        }
    }
}
