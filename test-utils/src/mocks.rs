//! Wiremock helpers standing in for the identity service.

use crate::fixtures::tokens_response;
use serde_json::Value;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

/// Path the identity mocks are mounted under; use as the client auth URL
/// suffix, e.g. `format!("{}{IDENTITY_PATH}", server.uri())`.
pub const IDENTITY_PATH: &str = "/v2.0";

/// Identity service URL on `server`.
#[must_use]
pub fn auth_url(server: &MockServer) -> String {
    format!("{}{IDENTITY_PATH}", server.uri())
}

/// A `POST /v2.0/tokens` mock that requires API key credentials and answers
/// with `body`.
#[must_use]
pub fn identity_mock(status: u16, body: Value) -> Mock {
    Mock::given(method("POST"))
        .and(path(format!("{IDENTITY_PATH}/tokens")))
        .and(body_partial_json(serde_json::json!({
            "auth": {"RAX-KSKEY:apiKeyCredentials": {"username": "username", "apiKey": "api_key"}}
        })))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
}

/// Mount an identity mock issuing `token` with the Big Data endpoint at
/// `endpoint`, expecting exactly `calls` authentications.
pub async fn mount_identity(server: &MockServer, token: &str, endpoint: &str, calls: u64) {
    identity_mock(200, tokens_response(token, endpoint))
        .expect(calls)
        .mount(server)
        .await;
}
