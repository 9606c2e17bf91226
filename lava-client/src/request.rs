//! Request composition: options, generated headers and URL joining.

use crate::{
    error::{LavaError, LavaResult},
    http::USER_AGENT,
};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use uuid::Uuid;

/// Auth token header.
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// Per-request correlation id header.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("client-request-id");

/// Optional parts of a request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Caller headers; generated headers replace entries with the same name
    pub headers: HeaderMap,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a caller header.
    ///
    /// # Errors
    ///
    /// Returns [`LavaError::Request`] if the name or value is not a valid header.
    pub fn header(mut self, name: &str, value: &str) -> LavaResult<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| LavaError::request(format!("Invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| LavaError::request(format!("Invalid header value for {name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`LavaError::Request`] if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> LavaResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Merge caller headers with the generated auth, request id and user agent
/// headers. Generated headers win on conflict.
///
/// # Errors
///
/// Returns [`LavaError::Authorization`] if the token is not a valid header value.
pub fn build_headers(
    caller: &HeaderMap,
    token: &SecretString,
    request_id: Uuid,
) -> LavaResult<HeaderMap> {
    let mut token = HeaderValue::from_str(token.expose_secret())
        .map_err(|_| LavaError::authorization("Auth token is not a valid header value"))?;
    token.set_sensitive(true);

    let mut headers = caller.clone();
    headers.insert(AUTH_TOKEN_HEADER, token);
    headers.insert(
        REQUEST_ID_HEADER,
        HeaderValue::from_str(&request_id.to_string())
            .map_err(|e| LavaError::request(e.to_string()))?,
    );
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    Ok(headers)
}

/// Join an endpoint and a request path with exactly one `/`.
#[must_use]
pub fn join_url(endpoint: &str, path: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        endpoint.to_string()
    } else {
        format!("{endpoint}/{path}")
    }
}
