use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Build the `Authorization: Bearer ...` header value, marked sensitive so it
/// never shows up in debug output.
pub fn bearer_header(token: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|e| Error::InvalidToken {
            message: format!("invalid bearer token header value: {e}"),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Default headers for a transport bound to `token`.
///
/// An absent or empty token yields no authorization header at all; such a
/// transport can still reach unauthenticated operations.
pub fn auth_headers(token: Option<&SecretString>) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token.filter(|t| !t.expose_secret().is_empty()) {
        headers.insert(AUTHORIZATION, bearer_header(token)?);
    }
    Ok(headers)
}
