//! Client library for the Rackspace Cloud Big Data (Lava) API.
//!
//! Authenticates against the identity service, resolves the Big Data endpoint
//! from the service catalog and sends JSON requests carrying an auth token, a
//! per-request correlation id and the client user agent. A request rejected
//! with 401 is retried once after reauthenticating.
//!
//! ```no_run
//! use lava_client::{LavaClient, LavaConfig, RequestOptions};
//!
//! # async fn run() -> lava_client::LavaResult<()> {
//! let config = LavaConfig::new("api_key", "username", "DFW").with_tenant_id("123456");
//! let client = LavaClient::new(config)?;
//! let _clusters: serde_json::Value = client.get("clusters", RequestOptions::new()).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod request;

pub use catalog::ServiceCatalog;
pub use client::LavaClient;
pub use config::LavaConfig;
pub use error::{LavaError, LavaResult};
pub use http::{HttpConfig, USER_AGENT};
pub use identity::{AuthResult, Authenticator, KeystoneAuthenticator};
pub use request::RequestOptions;
