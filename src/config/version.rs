//! Shopify Admin API version handling.
//!
//! This module provides the [`ApiVersion`] newtype for the version segment
//! of Admin API paths (`/admin/api/{version}/...`).

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A Shopify Admin API version in `YYYY-MM` form.
///
/// Shopify releases new API versions quarterly (January, April, July,
/// October). The app pins one version for all outbound calls.
///
/// # Example
///
/// ```rust
/// use storecredit::ApiVersion;
///
/// let version: ApiVersion = "2019-10".parse().unwrap();
/// assert_eq!(version.as_ref(), "2019-10");
/// assert_eq!(version, ApiVersion::default());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// The version the app is developed and tested against.
    pub const PINNED: &'static str = "2019-10";

    /// Creates a validated API version.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiVersion`] unless the string is
    /// `YYYY-MM` with a quarterly release month (01, 04, 07, 10).
    pub fn new(version: impl Into<String>) -> Result<Self, ConfigError> {
        let version = version.into();

        let invalid = || ConfigError::InvalidApiVersion {
            version: version.clone(),
        };

        let (year, month) = version.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !matches!(month, "01" | "04" | "07" | "10") {
            return Err(invalid());
        }

        Ok(Self(version))
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(Self::PINNED.to_string())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
