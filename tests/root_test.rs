mod common;

mod tests {
    use crate::common::{TEST_API_KEY, build_app, initialize_logging, test_config};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use history_proxy::{api::root::RootResponse, chains::CHAINS};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tower::ServiceExt;

    // Test: `/` route correct response
    #[rstest]
    #[case(Some(TEST_API_KEY), true)]
    #[case(None, false)]
    #[tokio::test]
    async fn test_route_root(#[case] api_key: Option<&str>, #[case] expected_configured: bool) {
        initialize_logging();

        let app = build_app(test_config(api_key, "http://127.0.0.1:1/api/v2.2"))
            .expect("Failed to build the application");

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .expect("Request to root route failed");

        assert_eq!(response.status(), StatusCode::OK);

        let body_bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let root_response: RootResponse =
            serde_json::from_slice(&body_bytes).expect("Response body is not valid JSON");

        assert_eq!(root_response.name, "history-proxy");
        assert_eq!(root_response.version, env!("CARGO_PKG_VERSION"));
        assert!(!root_response.revision.is_empty());
        assert_eq!(root_response.moralis_configured, expected_configured);
        assert_eq!(root_response.chains.len(), CHAINS.len());
        assert!(root_response.chains.contains(&"pulse".to_string()));
    }
}
