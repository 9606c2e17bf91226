//! Shared proptest generators.

use proptest::prelude::*;

/// Generate request paths, with or without a leading slash.
pub fn path_strategy() -> impl Strategy<Value = String> {
    (
        prop::bool::ANY,
        prop::collection::vec("[a-z][a-z0-9_-]{0,12}", 1..4),
    )
        .prop_map(|(leading, segments)| {
            let path = segments.join("/");
            if leading { format!("/{path}") } else { path }
        })
}

/// Generate endpoint URLs, with or without a trailing slash.
pub fn endpoint_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{3}", "[0-9]{6}", prop::bool::ANY).prop_map(|(region, tenant, trailing)| {
        let endpoint = format!("https://{region}.bigdata.api.example.com/v2/{tenant}");
        if trailing { format!("{endpoint}/") } else { endpoint }
    })
}

/// Generate caller header names, including the names the client generates.
pub fn header_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("X-Auth-Token".to_string()),
        Just("Client-Request-ID".to_string()),
        Just("User-Agent".to_string()),
        Just("Accept".to_string()),
        "x-[a-z]{1,12}",
    ]
}

/// Generate visible-ASCII header values.
pub fn header_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ._/-]{0,32}".prop_map(|v| v.trim().to_string())
}

/// Generate caller header sets.
pub fn caller_headers_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((header_name_strategy(), header_value_strategy()), 0..6)
}

/// Generate opaque auth tokens.
pub fn token_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{16,64}"
}
