//! End-to-end coverage with a real listener and a stubbed token endpoint.

use spotcred_auth::callback::{AuthorizationResult, CallbackListener};
use spotcred_auth::config::AuthConfig;
use spotcred_auth::error::AuthFlowError;
use spotcred_auth::exchange::{TokenExchanger, basic_credential};
use spotcred_auth::flow;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(port: u16) -> AuthConfig {
    AuthConfig {
        client_id: "test-client-id".to_string(),
        client_secret: "test-client-secret".to_string(),
        port,
        scope: "user-read-private streaming".to_string(),
    }
}

async fn stub_token_endpoint(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header(
            "authorization",
            basic_credential("test-client-id", "test-client-secret").as_str(),
        ))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn redirect_with_code_yields_the_refresh_token() {
    let server = stub_token_endpoint(serde_json::json!({
        "access_token": "a",
        "refresh_token": "R1",
        "token_type": "Bearer",
        "expires_in": 3600
    }))
    .await;

    let listener = CallbackListener::bind(8888).await.unwrap();
    let handle = tokio::spawn(async move { listener.wait_for_redirect().await });

    let response = reqwest::get("http://127.0.0.1:8888/callback?code=AQC123")
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("Authentication Successful"));

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result, AuthorizationResult::Code("AQC123".to_string()));

    let config = config(8888);
    let exchanger = TokenExchanger::with_token_url(format!("{}/api/token", server.uri()));
    let refresh_token = exchanger.exchange(&config, "AQC123").await.unwrap();
    assert_eq!(refresh_token, "R1");
}

#[tokio::test]
async fn missing_refresh_token_surfaces_the_response_body() {
    let server = stub_token_endpoint(serde_json::json!({
        "access_token": "a",
        "token_type": "Bearer",
        "expires_in": 3600
    }))
    .await;

    let config = config(8899);
    let exchanger = TokenExchanger::with_token_url(format!("{}/api/token", server.uri()));
    let err = exchanger.exchange(&config, "AQC123").await.unwrap_err();
    match err {
        AuthFlowError::RefreshTokenMissing { body } => {
            assert!(body.contains("access_token"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn rejected_exchange_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;

    let config = config(8899);
    let exchanger = TokenExchanger::with_token_url(format!("{}/api/token", server.uri()));
    let err = exchanger.exchange(&config, "stale-code").await.unwrap_err();
    match err {
        AuthFlowError::ExchangeRejected { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn denied_redirect_gets_400_and_never_reaches_the_exchanger() {
    // No token endpoint stub exists here; a denied redirect must not need one.
    let listener = CallbackListener::bind(0).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move { listener.wait_for_redirect().await });

    let response = reqwest::get(format!("http://{addr}/callback?error=access_denied"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(response.text().await.unwrap().contains("access_denied"));

    let result = handle.await.unwrap().unwrap();
    assert_eq!(
        result,
        AuthorizationResult::Denied("access_denied".to_string())
    );
}

#[tokio::test]
async fn probe_requests_do_not_consume_the_listener() {
    let listener = CallbackListener::bind(0).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move { listener.wait_for_redirect().await });

    let probe = reqwest::get(format!("http://{addr}/favicon.ico")).await.unwrap();
    assert_eq!(probe.status(), 404);

    // The listener is still alive and takes the real redirect afterwards.
    let response = reqwest::get(format!("http://{addr}/callback?code=later"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result, AuthorizationResult::Code("later".to_string()));
}

#[tokio::test]
async fn malformed_token_response_surfaces_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>upstream proxy error</html>"))
        .mount(&server)
        .await;

    let config = config(8899);
    let exchanger = TokenExchanger::with_token_url(format!("{}/api/token", server.uri()));
    let err = exchanger.exchange(&config, "AQC123").await.unwrap_err();
    match err {
        AuthFlowError::MalformedTokenResponse { body, .. } => {
            assert!(body.contains("upstream proxy error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn placeholder_credentials_stop_the_flow_before_it_binds() {
    // Take the port up front; getting Config rather than Bind back proves
    // validation runs before the listener ever binds.
    let taken = CallbackListener::bind(0).await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let mut config = config(port);
    config.client_id = "your_spotify_client_id".to_string();

    let err = flow::run(&config).await.unwrap_err();
    assert!(matches!(err, AuthFlowError::Config(_)));
}

#[tokio::test]
async fn binding_a_taken_port_is_a_bind_error() {
    let first = CallbackListener::bind(0).await.unwrap();
    let port = first.local_addr().unwrap().port();

    let err = CallbackListener::bind(port).await.unwrap_err();
    match err {
        AuthFlowError::Bind { port: p, .. } => assert_eq!(p, port),
        other => panic!("unexpected error: {other:?}"),
    }
}
