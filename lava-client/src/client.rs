//! Lava HTTP client with cached authentication and reauthentication on 401.

use crate::{
    config::LavaConfig,
    error::{LavaError, LavaResult},
    http::build_http_client,
    identity::{Authenticator, KeystoneAuthenticator},
    request::{RequestOptions, build_headers, join_url},
};
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

/// Cached authentication state.
#[derive(Debug, Clone)]
struct Session {
    token: SecretString,
    endpoint: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Client for the Big Data API.
///
/// Authenticates lazily on the first request and keeps the token until the
/// API rejects it or it is about to expire.
pub struct LavaClient {
    config: LavaConfig,
    http: Client,
    authenticator: Arc<dyn Authenticator>,
    session: RwLock<Option<Session>>,
}

impl std::fmt::Debug for LavaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LavaClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LavaClient {
    /// Create a client that authenticates against the configured identity service.
    ///
    /// # Errors
    ///
    /// Returns [`LavaError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: LavaConfig) -> LavaResult<Self> {
        config.validate()?;
        let http = build_http_client(&config.http)?;
        let authenticator = Arc::new(KeystoneAuthenticator::new(http.clone(), &config));
        Ok(Self::from_parts(config, http, authenticator))
    }

    /// Create a client with a custom authenticator.
    ///
    /// # Errors
    ///
    /// Returns [`LavaError::InvalidConfig`] if the configuration is invalid.
    pub fn with_authenticator(
        config: LavaConfig,
        authenticator: Arc<dyn Authenticator>,
    ) -> LavaResult<Self> {
        config.validate()?;
        let http = build_http_client(&config.http)?;
        Ok(Self::from_parts(config, http, authenticator))
    }

    fn from_parts(
        config: LavaConfig,
        http: Client,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            config,
            http,
            authenticator,
            session: RwLock::new(None),
        }
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &LavaConfig {
        &self.config
    }

    /// Endpoint of the current session, if authenticated.
    pub async fn endpoint(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|s| s.endpoint.clone())
    }

    /// Authenticate and replace the cached session.
    ///
    /// # Errors
    ///
    /// Returns [`LavaError::Authorization`] if the credentials are rejected or
    /// the catalog has no endpoint for the configured service and region, and
    /// [`LavaError::Request`] if the identity service cannot be reached.
    pub async fn authenticate(&self) -> LavaResult<()> {
        self.refresh_session().await.map(drop)
    }

    #[instrument(skip(self), fields(region = %self.config.region))]
    async fn refresh_session(&self) -> LavaResult<Session> {
        let auth = self.authenticator.authenticate().await?;

        let endpoint = match &self.config.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => auth
                .catalog
                .url_for(&self.config.service_type, &self.config.region)
                .map(str::to_string)
                .ok_or_else(|| {
                    LavaError::authorization(format!(
                        "No {} endpoint in region {}",
                        self.config.service_type, self.config.region
                    ))
                })?,
        };

        info!(%endpoint, expires_at = ?auth.expires_at, "Authenticated with identity service");
        let session = Session {
            token: auth.token,
            endpoint,
            expires_at: auth.expires_at,
        };
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Drop the cached session; the next request authenticates again.
    pub async fn invalidate(&self) {
        *self.session.write().await = None;
    }

    async fn current_session(&self) -> LavaResult<Session> {
        let cached = self.session.read().await.clone();
        match cached {
            Some(session) if !self.expiring(&session) => Ok(session),
            _ => self.refresh_session().await,
        }
    }

    fn expiring(&self, session: &Session) -> bool {
        session.expires_at.is_some_and(|expires_at| {
            let remaining = expires_at.signed_duration_since(Utc::now());
            !remaining
                .to_std()
                .is_ok_and(|r| r >= self.config.expiry_grace)
        })
    }

    /// Send a GET request.
    ///
    /// # Errors
    ///
    /// See [`LavaClient::request`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> LavaResult<T> {
        self.request(Method::GET, path, options).await
    }

    /// Send a POST request.
    ///
    /// # Errors
    ///
    /// See [`LavaClient::request`].
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> LavaResult<T> {
        self.request(Method::POST, path, options).await
    }

    /// Send a PUT request.
    ///
    /// # Errors
    ///
    /// See [`LavaClient::request`].
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> LavaResult<T> {
        self.request(Method::PUT, path, options).await
    }

    /// Send a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`LavaClient::request`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> LavaResult<T> {
        self.request(Method::DELETE, path, options).await
    }

    /// Send a request to `<endpoint>/<path>` and decode the JSON response.
    ///
    /// A 401 response triggers one reauthentication and one retry with the
    /// new session, whatever its expiry. An empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns [`LavaError::Authorization`] if the retried request is still
    /// unauthorized, and [`LavaError::Request`] for any other error status,
    /// transport failure or undecodable body.
    #[instrument(skip(self, options), fields(request_id = tracing::field::Empty))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> LavaResult<T> {
        let session = self.current_session().await?;
        let mut response = self.send(&session, &method, path, &options).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(path, "Token rejected, reauthenticating");
            let session = self.refresh_session().await?;
            response = self.send(&session, &method, path, &options).await?;

            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(LavaError::authorization(format!(
                    "{method} {path} unauthorized after reauthentication"
                )));
            }
        }

        Self::decode(response).await
    }

    async fn send(
        &self,
        session: &Session,
        method: &Method,
        path: &str,
        options: &RequestOptions,
    ) -> LavaResult<Response> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", tracing::field::display(request_id));

        let url = join_url(&session.endpoint, path);
        let headers = build_headers(&options.headers, &session.token, request_id)?;
        debug!(%url, %request_id, "Dispatching request");

        let mut request = self.http.request(method.clone(), &url).headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| LavaError::request(format!("{method} {url} failed: {e}")))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> LavaResult<T> {
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(LavaError::status(status, format!("Status {status}: {text}")));
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::ServiceCatalog, identity::AuthResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingAuthenticator {
        calls: AtomicUsize,
        expires_at: Option<DateTime<Utc>>,
    }

    #[async_trait]
    impl Authenticator for CountingAuthenticator {
        async fn authenticate(&self) -> LavaResult<AuthResult> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AuthResult {
                token: SecretString::from(format!("token-{n}")),
                expires_at: self.expires_at,
                catalog: ServiceCatalog::default(),
            })
        }
    }

    fn client(expires_at: Option<DateTime<Utc>>) -> (LavaClient, Arc<CountingAuthenticator>) {
        let auth = Arc::new(CountingAuthenticator {
            calls: AtomicUsize::new(0),
            expires_at,
        });
        let config = LavaConfig::new("api_key", "username", "region")
            .with_endpoint("http://127.0.0.1:1/v2/tenant_id");
        let client = LavaClient::with_authenticator(config, auth.clone()).unwrap();
        (client, auth)
    }

    #[tokio::test]
    async fn test_session_cached() {
        let (client, auth) = client(None);
        client.current_session().await.unwrap();
        client.current_session().await.unwrap();
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            client.endpoint().await.as_deref(),
            Some("http://127.0.0.1:1/v2/tenant_id")
        );
    }

    #[tokio::test]
    async fn test_expiring_session_refreshed() {
        let (client, auth) = client(Some(Utc::now() + chrono::Duration::seconds(10)));
        client.current_session().await.unwrap();
        client.current_session().await.unwrap();
        assert_eq!(auth.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fresh_session_kept() {
        let (client, auth) = client(Some(Utc::now() + chrono::Duration::hours(12)));
        client.current_session().await.unwrap();
        client.current_session().await.unwrap();
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let (client, auth) = client(None);
        client.current_session().await.unwrap();
        client.invalidate().await;
        assert!(client.endpoint().await.is_none());
        client.current_session().await.unwrap();
        assert_eq!(auth.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_catalog_endpoint() {
        let auth = Arc::new(CountingAuthenticator {
            calls: AtomicUsize::new(0),
            expires_at: None,
        });
        let config = LavaConfig::new("api_key", "username", "region");
        let client = LavaClient::with_authenticator(config, auth).unwrap();

        let err = client.authenticate().await.unwrap_err();
        assert!(err.is_authorization());
        assert_eq!(
            err.to_string(),
            "Authorization failed: No rax:bigdata endpoint in region region"
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = LavaConfig::new("", "username", "region");
        assert!(matches!(LavaClient::new(config), Err(LavaError::InvalidConfig(_))));
    }
}
