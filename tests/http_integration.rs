//! Integration tests for the HTTP transport using wiremock
//!
//! These tests verify the transport behavior against mocked endpoints,
//! ensuring proper handling of various response codes, timeouts and retries.

use restobj::client::{ApiClient, Method, Transport, TransportConfig};
use restobj::TransportError;
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{basic_auth, bearer_token, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    // Notice the intentional trailing /
    let config = TransportConfig::new(&format!("{}/", server.uri()));
    ApiClient::new(config).expect("client should build")
}

/// Test module for transport integration tests
mod transport_tests {
    use super::*;

    /// Test successful GET returns the raw body
    #[tokio::test]
    async fn test_get_success_returns_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("It works!"))
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send(Method::Get, "/ok", None)
            .await
            .expect("Request should succeed");

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "It works!");
    }

    /// Test a request that outlives the timeout fails with a timeout error
    #[tokio::test]
    async fn test_timeout_aborts_slow_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("This will never return!")
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let mut config = TransportConfig::new(&server.uri());
        config.timeout = 2;
        let client = ApiClient::new(config).unwrap();

        let started = Instant::now();
        let err = client
            .send(Method::Get, "/slow", None)
            .await
            .expect_err("Timeout should trigger on slow request");

        assert!(err.is_timeout(), "expected timeout, got {err:?}");
        assert_eq!(err.status(), None);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    /// Test 404 surfaces as a status error, not a timeout
    #[tokio::test]
    async fn test_404_returns_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/widgets/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Widget not found"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send(Method::Get, "/widgets/missing", None)
            .await
            .expect_err("404 is an error");

        match err {
            TransportError::Status { status, body, .. } => {
                assert_eq!(status, 404);
                assert!(body.contains("Widget not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Test non-2xx responses are never retried
    #[tokio::test]
    async fn test_server_error_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/widgets/1"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = TransportConfig::new(&server.uri());
        config.retries = 3;
        let client = ApiClient::new(config).unwrap();

        let err = client
            .send(Method::Put, "/widgets/1", Some("{}".to_string()))
            .await
            .expect_err("503 is an error");
        assert_eq!(err.status(), Some(503));
    }

    /// Test connection failures are retried and then reported as such
    #[tokio::test]
    async fn test_connection_failure_retried() {
        // Grab a free port and release it so nothing is listening there
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut config = TransportConfig::new(&format!("http://127.0.0.1:{}", port));
        config.retries = 2;
        let client = ApiClient::new(config).unwrap();

        let err = client
            .send(Method::Get, "/ok", None)
            .await
            .expect_err("Nothing is listening");

        match err {
            TransportError::Connect { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Test POST sends the JSON body with a content type
    #[tokio::test]
    async fn test_post_with_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/widgets"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "gizmo"})))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Location", "https://api.example.com/api/widgets/42"),
            )
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send(
                Method::Post,
                "/api/widgets",
                Some(r#"{"name":"gizmo"}"#.to_string()),
            )
            .await
            .expect("Request should succeed");

        assert_eq!(response.status, 201);
        assert_eq!(
            response.headers.last("location"),
            Some("https://api.example.com/api/widgets/42")
        );
        assert!(response.body.is_empty());
    }

    /// Test DELETE with an empty 204 response
    #[tokio::test]
    async fn test_delete_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/widgets/9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send(Method::Delete, "/widgets/9", None)
            .await
            .expect("Request should succeed");

        assert_eq!(response.status, 204);
        assert!(response.body.is_empty());
    }

    /// Test credentials and custom headers are attached to every request
    #[tokio::test]
    async fn test_credentials_and_headers_attached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/secure"))
            .and(basic_auth("admin", "hunter2"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/token"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let mut config = TransportConfig::new(&server.uri());
        config.username = Some("admin".to_string());
        config.password = Some("hunter2".to_string());
        config
            .headers
            .insert("X-Api-Key".to_string(), "secret".to_string());
        let client = ApiClient::new(config).unwrap();
        client
            .send(Method::Get, "/secure", None)
            .await
            .expect("basic auth and header should match");

        let mut config = TransportConfig::new(&server.uri());
        config.bearer_token = Some("test-token".to_string());
        let client = ApiClient::new(config).unwrap();
        client
            .send(Method::Get, "/token", None)
            .await
            .expect("bearer token should match");
    }

    /// Test a shared client serves concurrent callers
    #[tokio::test]
    async fn test_shared_client_concurrent_calls() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("It works!"))
            .expect(8)
            .mount(&server)
            .await;

        let client = std::sync::Arc::new(client_for(&server));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.send(Method::Get, "/ok", None).await })
            })
            .collect();

        for handle in handles {
            let response = handle.await.unwrap().expect("Request should succeed");
            assert_eq!(response.body, "It works!");
        }
    }
}
