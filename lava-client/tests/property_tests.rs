//! Property-based tests for request composition.

use lava_client::{
    USER_AGENT,
    request::{AUTH_TOKEN_HEADER, REQUEST_ID_HEADER, RequestOptions, build_headers, join_url},
};
use proptest::prelude::*;
use reqwest::header;
use secrecy::SecretString;
use test_utils::{caller_headers_strategy, endpoint_strategy, path_strategy, token_strategy};
use uuid::Uuid;

fn is_generated(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    ["x-auth-token", "client-request-id", "user-agent"].contains(&name.as_str())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Generated headers are always present and override caller values.
    #[test]
    fn prop_generated_headers_always_present(
        caller in caller_headers_strategy(),
        token in token_strategy(),
    ) {
        let mut options = RequestOptions::new();
        for (name, value) in &caller {
            options = options.header(name, value).unwrap();
        }
        let request_id = Uuid::new_v4();
        let secret = SecretString::from(token.clone());
        let headers = build_headers(&options.headers, &secret, request_id).unwrap();

        prop_assert_eq!(headers.get(AUTH_TOKEN_HEADER).unwrap().to_str().unwrap(), token.as_str());
        prop_assert_eq!(
            headers.get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
            request_id.to_string()
        );
        prop_assert_eq!(headers.get(header::USER_AGENT).unwrap().to_str().unwrap(), USER_AGENT);
        for name in [AUTH_TOKEN_HEADER, REQUEST_ID_HEADER, header::USER_AGENT] {
            prop_assert_eq!(headers.get_all(name).iter().count(), 1);
        }
    }

    /// Caller headers with other names pass through unchanged.
    #[test]
    fn prop_caller_headers_preserved(
        caller in caller_headers_strategy(),
        token in token_strategy(),
    ) {
        let mut options = RequestOptions::new();
        for (name, value) in &caller {
            options = options.header(name, value).unwrap();
        }
        let secret = SecretString::from(token);
        let headers = build_headers(&options.headers, &secret, Uuid::new_v4()).unwrap();

        for (name, _) in caller.iter().filter(|(n, _)| !is_generated(n)) {
            prop_assert_eq!(headers.get(name.as_str()), options.headers.get(name.as_str()));
        }
    }

    /// Endpoint and path are joined by exactly one slash.
    #[test]
    fn prop_join_url_single_slash(
        endpoint in endpoint_strategy(),
        path in path_strategy(),
    ) {
        let url = join_url(&endpoint, &path);
        let base = endpoint.trim_end_matches('/');
        let rest = path.trim_start_matches('/');

        prop_assert_eq!(&url, &format!("{base}/{rest}"));
        prop_assert!(!url["https://".len()..].contains("//"));
    }
}
