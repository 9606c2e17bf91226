//! Lava client configuration.

use crate::{
    error::{LavaError, LavaResult},
    http::HttpConfig,
};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Rackspace cloud identity endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://identity.api.rackspacecloud.com/v2.0";

/// Service type of the Big Data API in the service catalog.
pub const DEFAULT_SERVICE_TYPE: &str = "rax:bigdata";

/// Lava client configuration.
#[derive(Debug, Clone)]
pub struct LavaConfig {
    /// API key used to authenticate
    pub api_key: SecretString,
    /// Account username
    pub username: String,
    /// Region used for the catalog lookup
    pub region: String,
    /// Tenant to scope the token to
    pub tenant_id: Option<String>,
    /// Identity service URL
    pub auth_url: String,
    /// Explicit API endpoint; skips the catalog lookup when set
    pub endpoint: Option<String>,
    /// Catalog service type
    pub service_type: String,
    /// Re-authenticate when the token expires within this window
    pub expiry_grace: Duration,
    /// HTTP transport settings
    pub http: HttpConfig,
}

impl LavaConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        username: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            username: username.into(),
            region: region.into(),
            tenant_id: None,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            endpoint: None,
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            expiry_grace: Duration::from_secs(60),
            http: HttpConfig::default(),
        }
    }

    /// Load configuration from `LAVA_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`LavaError::InvalidConfig`] if a required variable is missing.
    pub fn from_env() -> LavaResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `LAVA_API_KEY`, `LAVA_USERNAME` and `LAVA_REGION` are required;
    /// `LAVA_TENANT_ID`, `LAVA_AUTH_URL`, `LAVA_ENDPOINT` and `LAVA_PROXY`
    /// are optional. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`LavaError::InvalidConfig`] if a required variable is missing.
    pub fn from_lookup<F>(lookup: F) -> LavaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| LavaError::invalid_config(format!("{key} is not set")))
        };

        let mut config = Self::new(
            require("LAVA_API_KEY")?,
            require("LAVA_USERNAME")?,
            require("LAVA_REGION")?,
        );
        config.tenant_id = get("LAVA_TENANT_ID");
        if let Some(auth_url) = get("LAVA_AUTH_URL") {
            config.auth_url = auth_url;
        }
        config.endpoint = get("LAVA_ENDPOINT");
        config.http.proxy = get("LAVA_PROXY");
        Ok(config)
    }

    /// Set the tenant id.
    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the identity service URL.
    #[must_use]
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Use a fixed API endpoint instead of the service catalog.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the catalog service type.
    #[must_use]
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    /// Set the token expiry grace period.
    #[must_use]
    pub const fn with_expiry_grace(mut self, grace: Duration) -> Self {
        self.expiry_grace = grace;
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = Some(timeout);
        self
    }

    /// Route traffic through a proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.http.proxy = Some(proxy.into());
        self
    }

    /// Validate credentials and URLs.
    ///
    /// # Errors
    ///
    /// Returns [`LavaError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> LavaResult<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(LavaError::invalid_config("api key is empty"));
        }
        if self.username.trim().is_empty() {
            return Err(LavaError::invalid_config("username is empty"));
        }
        if self.region.trim().is_empty() {
            return Err(LavaError::invalid_config("region is empty"));
        }
        if self.service_type.trim().is_empty() {
            return Err(LavaError::invalid_config("service type is empty"));
        }

        Url::parse(&self.auth_url)
            .map_err(|e| LavaError::invalid_config(format!("auth url {}: {e}", self.auth_url)))?;
        if let Some(endpoint) = &self.endpoint {
            Url::parse(endpoint)
                .map_err(|e| LavaError::invalid_config(format!("endpoint {endpoint}: {e}")))?;
        }
        Ok(())
    }
}
