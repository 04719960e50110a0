//! Callback query parameters, in wire order.
//!
//! Shopify signs the callback over the query string as it was sent, so the
//! parameters must be kept in their original order for verification. A
//! plain map would lose that ordering; [`CallbackParams`] keeps the
//! decoded key/value pairs as a sequence.

use std::fmt;

/// The query parameters of an OAuth callback request.
///
/// Parsed from the raw query string, preserving the order in which the
/// parameters arrived. Lookups return the first occurrence of a key.
///
/// # Example
///
/// ```rust
/// use storecredit::auth::oauth::CallbackParams;
///
/// let params = CallbackParams::parse("code=abc&shop=x.myshopify.com&state=n&hmac=ff");
/// assert_eq!(params.code(), Some("abc"));
/// assert_eq!(params.shop(), Some("x.myshopify.com"));
///
/// // The signable form drops hmac (and signature) but keeps the order
/// assert_eq!(
///     params.to_signable_string(),
///     "code=abc&shop=x.myshopify.com&state=n"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackParams {
    pairs: Vec<(String, String)>,
}

impl CallbackParams {
    /// Keys excluded from the signable string because they carry the
    /// signature itself.
    const SIGNATURE_KEYS: [&'static str; 2] = ["hmac", "signature"];

    /// Parses a raw query string (without the leading `?`).
    ///
    /// Both keys and values are percent-decoded, with `+` treated as a
    /// space. Entries without a `=` become keys with empty values.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (key, value) = part.split_once('=').unwrap_or((part, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();

        Self { pairs }
    }

    /// Returns the first value for `key`, if present and non-empty.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// The `shop` parameter.
    #[must_use]
    pub fn shop(&self) -> Option<&str> {
        self.get("shop")
    }

    /// The `hmac` parameter.
    #[must_use]
    pub fn hmac(&self) -> Option<&str> {
        self.get("hmac")
    }

    /// The `code` parameter.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.get("code")
    }

    /// The `state` parameter.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.get("state")
    }

    /// Serializes the parameters Shopify signed: all pairs except the
    /// `hmac` and `signature` keys, percent-encoded, `&`-joined, in the
    /// order they arrived.
    #[must_use]
    pub fn to_signable_string(&self) -> String {
        self.pairs
            .iter()
            .filter(|(k, _)| !Self::SIGNATURE_KEYS.contains(&k.as_str()))
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for CallbackParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        f.write_str(&joined)
    }
}

/// Percent-decodes one query component, mapping `+` to a space first.
fn decode_component(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    urlencoding::decode(&plus_decoded).map_or_else(|_| plus_decoded.clone(), |s| s.into_owned())
}
