//! Identity service fixtures.

use chrono::{Duration, Utc};
use serde_json::{Value, json};

/// Catalog service type of the Big Data API.
pub const BIGDATA_SERVICE_TYPE: &str = "rax:bigdata";

/// Region used by the fixtures.
pub const REGION: &str = "DFW";

/// Tenant used by the fixtures.
pub const TENANT_ID: &str = "tenant_id";

/// A Big Data catalog entry with a single endpoint in [`REGION`].
#[must_use]
pub fn bigdata_entry(endpoint: &str) -> Value {
    json!({
        "name": "cloudBigData",
        "type": BIGDATA_SERVICE_TYPE,
        "endpoints": [
            {
                "region": REGION,
                "tenantId": TENANT_ID,
                "publicURL": endpoint
            }
        ]
    })
}

/// A `POST /tokens` response body carrying `token`, valid for a day, whose
/// catalog points the Big Data service at `endpoint`.
#[must_use]
pub fn tokens_response(token: &str, endpoint: &str) -> Value {
    tokens_response_with_catalog(token, json!([bigdata_entry(endpoint)]))
}

/// A `POST /tokens` response body with an arbitrary catalog.
#[must_use]
pub fn tokens_response_with_catalog(token: &str, catalog: Value) -> Value {
    access(token, Duration::hours(24), catalog)
}

/// A `POST /tokens` response body whose token expires after `lifetime`.
#[must_use]
pub fn tokens_response_expiring(token: &str, endpoint: &str, lifetime: Duration) -> Value {
    access(token, lifetime, json!([bigdata_entry(endpoint)]))
}

fn access(token: &str, lifetime: Duration, catalog: Value) -> Value {
    let expires = (Utc::now() + lifetime).to_rfc3339();
    json!({
        "access": {
            "token": {
                "id": token,
                "expires": expires,
                "tenant": {"id": TENANT_ID, "name": TENANT_ID}
            },
            "serviceCatalog": catalog,
            "user": {
                "id": "10000",
                "name": "username",
                "RAX-AUTH:defaultRegion": REGION
            }
        }
    })
}

/// A sample cluster listing as returned by the Big Data API.
#[must_use]
pub fn clusters_response() -> Value {
    json!({
        "clusters": [
            {
                "id": "c0f5ba8e-3b22-4d23-a2dd-1a0e1fd8c8c4",
                "name": "analytics",
                "status": "ACTIVE",
                "stack_id": "HADOOP_HDP2_2",
                "node_groups": []
            }
        ]
    })
}
