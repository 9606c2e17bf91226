//! HTTP client configuration and building.
//!
//! Timeouts are optional; when unset the reqwest defaults apply.

use crate::error::{LavaError, LavaResult};
use reqwest::{Client, ClientBuilder, Proxy};
use std::time::Duration;

/// User agent sent with every request: `"<crate name> <crate version>"`.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Total request timeout
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// Pool idle timeout (default: 90s)
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host (default: 10)
    pub pool_max_idle_per_host: usize,
    /// Proxy URL applied to all schemes (`http://`, `https://` or `socks5://`)
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            proxy: None,
        }
    }
}

impl HttpConfig {
    /// Set the total request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Route all traffic through a proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set pool settings.
    #[must_use]
    pub const fn with_pool_config(mut self, idle_timeout: Duration, max_idle: usize) -> Self {
        self.pool_idle_timeout = idle_timeout;
        self.pool_max_idle_per_host = max_idle;
        self
    }
}

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns [`LavaError::InvalidConfig`] if the proxy URL is rejected or the
/// client cannot be built (e.g. TLS initialization fails).
pub fn build_http_client(config: &HttpConfig) -> LavaResult<Client> {
    let mut builder = ClientBuilder::new()
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .user_agent(USER_AGENT)
        .use_rustls_tls();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(proxy) = &config.proxy {
        let proxy = Proxy::all(proxy)
            .map_err(|e| LavaError::invalid_config(format!("proxy {proxy}: {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| LavaError::invalid_config(format!("HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, None);
        assert_eq!(config.connect_timeout, None);
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::default()
            .with_timeout(Duration::from_secs(60))
            .with_proxy("socks5://localhost:8080");

        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.proxy.as_deref(), Some("socks5://localhost:8080"));
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(USER_AGENT, format!("lava-client {}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_build_client() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
        let config = HttpConfig::default().with_proxy("socks5://127.0.0.1:1080");
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_build_client_rejects_bad_proxy() {
        let config = HttpConfig::default().with_proxy("not a url");
        let err = build_http_client(&config).unwrap_err();
        assert!(matches!(err, LavaError::InvalidConfig(_)));
    }
}
