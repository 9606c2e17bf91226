//! Identity service authentication.
//!
//! [`KeystoneAuthenticator`] requests a token with Rackspace API key
//! credentials and returns it together with the service catalog.

use crate::{
    catalog::ServiceCatalog,
    config::LavaConfig,
    error::{LavaError, LavaResult},
    http::USER_AGENT,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Outcome of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Token to send as `X-Auth-Token`
    pub token: SecretString,
    /// Token expiry, when the identity service reports one
    pub expires_at: Option<DateTime<Utc>>,
    /// Services reachable with the token
    pub catalog: ServiceCatalog,
}

/// Source of auth tokens and service catalogs.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Obtain a fresh token and catalog.
    async fn authenticate(&self) -> LavaResult<AuthResult>;
}

/// Authenticates against a Keystone v2 compatible identity service.
#[derive(Debug, Clone)]
pub struct KeystoneAuthenticator {
    http: Client,
    tokens_url: String,
    username: String,
    api_key: SecretString,
    tenant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    access: Access,
}

#[derive(Debug, Deserialize)]
struct Access {
    token: Token,
    #[serde(rename = "serviceCatalog", default)]
    service_catalog: ServiceCatalog,
}

#[derive(Debug, Deserialize)]
struct Token {
    id: String,
    #[serde(default)]
    expires: Option<DateTime<Utc>>,
}

impl KeystoneAuthenticator {
    /// Create an authenticator from the client configuration.
    #[must_use]
    pub fn new(http: Client, config: &LavaConfig) -> Self {
        Self {
            http,
            tokens_url: format!("{}/tokens", config.auth_url.trim_end_matches('/')),
            username: config.username.clone(),
            api_key: config.api_key.clone(),
            tenant_id: config.tenant_id.clone(),
        }
    }

    fn credentials(&self) -> serde_json::Value {
        let mut auth = serde_json::json!({
            "RAX-KSKEY:apiKeyCredentials": {
                "username": self.username,
                "apiKey": self.api_key.expose_secret(),
            }
        });
        if let Some(tenant_id) = &self.tenant_id {
            auth["tenantId"] = serde_json::Value::String(tenant_id.clone());
        }
        serde_json::json!({ "auth": auth })
    }
}

#[async_trait]
impl Authenticator for KeystoneAuthenticator {
    #[instrument(skip(self), fields(username = %self.username, url = %self.tokens_url))]
    async fn authenticate(&self) -> LavaResult<AuthResult> {
        let response = self
            .http
            .post(&self.tokens_url)
            .header(header::USER_AGENT, USER_AGENT)
            .json(&self.credentials())
            .send()
            .await
            .map_err(|e| LavaError::request(format!("Identity service unreachable: {e}")))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(LavaError::authorization(format!(
                "Identity service rejected credentials for {}: status {status}",
                self.username
            )));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LavaError::status(
                status,
                format!("Identity service returned status {status}: {text}"),
            ));
        }

        let body = response.bytes().await?;
        let tokens: TokensResponse = serde_json::from_slice(&body)?;
        debug!(
            services = tokens.access.service_catalog.entries().len(),
            "Received identity token"
        );

        Ok(AuthResult {
            token: SecretString::from(tokens.access.token.id),
            expires_at: tokens.access.token.expires,
            catalog: tokens.access.service_catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_url() {
        let config =
            LavaConfig::new("key", "user", "dfw").with_auth_url("https://id.example.com/v2.0/");
        let auth = KeystoneAuthenticator::new(Client::new(), &config);
        assert_eq!(auth.tokens_url, "https://id.example.com/v2.0/tokens");
    }

    #[test]
    fn test_credentials_body() {
        let config = LavaConfig::new("key", "user", "dfw");
        let auth = KeystoneAuthenticator::new(Client::new(), &config);
        assert_eq!(
            auth.credentials(),
            serde_json::json!({
                "auth": {
                    "RAX-KSKEY:apiKeyCredentials": {"username": "user", "apiKey": "key"}
                }
            })
        );

        let auth = KeystoneAuthenticator::new(Client::new(), &config.with_tenant_id("123456"));
        assert_eq!(auth.credentials()["auth"]["tenantId"], "123456");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LavaConfig::new("super-secret-key", "user", "dfw");
        let auth = KeystoneAuthenticator::new(Client::new(), &config);
        assert!(!format!("{auth:?}").contains("super-secret-key"));
    }

    #[test]
    fn test_parse_tokens_response() {
        let tokens: TokensResponse = serde_json::from_value(serde_json::json!({
            "access": {
                "token": {
                    "id": "auth_token",
                    "expires": "2026-10-18T12:00:00.000Z",
                    "tenant": {"id": "123456", "name": "123456"}
                },
                "serviceCatalog": [
                    {
                        "name": "cloudBigData",
                        "type": "rax:bigdata",
                        "endpoints": [{"region": "DFW", "publicURL": "https://dfw.example.com/v2"}]
                    }
                ],
                "user": {"id": "1", "name": "user"}
            }
        }))
        .unwrap();

        assert_eq!(tokens.access.token.id, "auth_token");
        assert!(tokens.access.token.expires.is_some());
        assert_eq!(
            tokens.access.service_catalog.url_for("rax:bigdata", "dfw"),
            Some("https://dfw.example.com/v2")
        );
    }
}
