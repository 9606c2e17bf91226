//! Service catalog returned by the identity service.

use serde::{Deserialize, Serialize};

/// A single endpoint of a catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Region the endpoint serves; global endpoints have none
    #[serde(default)]
    pub region: Option<String>,
    /// Tenant the endpoint is scoped to
    #[serde(default, rename = "tenantId")]
    pub tenant_id: Option<String>,
    /// Public URL
    #[serde(rename = "publicURL")]
    pub public_url: String,
    /// Service-network URL
    #[serde(default, rename = "internalURL")]
    pub internal_url: Option<String>,
}

/// A service entry in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Service name, e.g. `cloudBigData`
    #[serde(default)]
    pub name: String,
    /// Service type, e.g. `rax:bigdata`
    #[serde(rename = "type")]
    pub service_type: String,
    /// Endpoints by region
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Directory of service endpoints keyed by service type and region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCatalog {
    entries: Vec<CatalogEntry>,
}

impl ServiceCatalog {
    /// Create a catalog from its entries.
    #[must_use]
    pub const fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Catalog entries.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Public URL for `service_type` in `region`.
    ///
    /// Regions compare case-insensitively. An endpoint without a region
    /// matches any region. The first match wins.
    #[must_use]
    pub fn url_for(&self, service_type: &str, region: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.service_type == service_type)
            .flat_map(|entry| entry.endpoints.iter())
            .find(|endpoint| {
                endpoint
                    .region
                    .as_deref()
                    .is_none_or(|r| r.eq_ignore_ascii_case(region))
            })
            .map(|endpoint| endpoint.public_url.as_str())
    }
}
