//! Authenticated-session policy tests against a mock HTTP server.

mod common;

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use agora_client::{ApiRequest, ClientError, FilePart};
use common::Harness;

fn verify_ok(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "token": token }))
}

#[tokio::test]
async fn cached_token_is_used_without_an_auth_call() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri(), Some("cached-token"));

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(verify_ok("unused"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(query_param("self", "true"))
        .and(header("authorization", "Bearer cached-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "handle": "ada" })))
        .expect(1)
        .mount(&server)
        .await;

    let response = harness
        .session
        .execute(&ApiRequest::get("/profile?self=true"))
        .await
        .expect("request should succeed");
    let value = response.into_value().expect("json body");

    assert_eq!(value, json!({ "handle": "ada" }));
    assert_eq!(harness.session.signer().auth_calls(), 0);
}

#[tokio::test]
async fn missing_token_triggers_exactly_one_auth_exchange() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri(), None);

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(verify_ok("fresh-token"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "posts": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let response = harness
        .session
        .execute(&ApiRequest::get("/posts?limit=50"))
        .await
        .expect("request should succeed");

    assert!(response.is_success());
    assert_eq!(harness.session.signer().auth_calls(), 1);
    assert_eq!(harness.token_on_disk().as_deref(), Some("fresh-token"));
}

/// Responds 200 only if the token file already holds the fresh token,
/// proving the token is persisted before the business request goes out.
struct RequireTokenOnDisk {
    path: std::path::PathBuf,
}

impl Respond for RequireTokenOnDisk {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        match std::fs::read_to_string(&self.path) {
            Ok(token) if token == "fresh-token" => {
                ResponseTemplate::new(200).set_body_json(json!({ "post": { "id": "p1" } }))
            }
            _ => ResponseTemplate::new(500).set_body_string("token file not written yet"),
        }
    }
}

#[tokio::test]
async fn token_is_persisted_before_the_request_is_issued() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri(), None);

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(verify_ok("fresh-token"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(RequireTokenOnDisk {
            path: harness.token_file.clone(),
        })
        .expect(1)
        .mount(&server)
        .await;

    let response = harness
        .session
        .execute(&ApiRequest::post("/posts").json(json!({ "content": "hi" })))
        .await
        .expect("request should succeed");
    let value = response.into_value().expect("json body");

    assert_eq!(value["post"]["id"], "p1");
}

#[tokio::test]
async fn unauthorized_response_triggers_one_reauth_and_one_retry() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri(), Some("stale-token"));

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(verify_ok("fresh-token"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "posts": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let response = harness
        .session
        .execute(&ApiRequest::get("/posts"))
        .await
        .expect("request should succeed");

    assert!(response.is_success());
    assert_eq!(harness.session.signer().auth_calls(), 1);
    assert_eq!(harness.token_on_disk().as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn second_unauthorized_is_returned_not_retried() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri(), Some("stale-token"));

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(verify_ok("still-rejected"))
        .expect(1)
        .mount(&server)
        .await;
    // Both attempts are rejected; exactly two requests reach the endpoint.
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
        .expect(2)
        .mount(&server)
        .await;

    let response = harness
        .session
        .execute(&ApiRequest::get("/posts"))
        .await
        .expect("the 401 is a response, not an error");

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(harness.session.signer().auth_calls(), 1);
}

#[tokio::test]
async fn auth_rejection_propagates_server_body() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri(), None);

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad signature"))
        .expect(1)
        .mount(&server)
        .await;

    let err = harness
        .session
        .execute(&ApiRequest::get("/profile?self=true"))
        .await
        .expect_err("authentication should fail");

    match err {
        ClientError::AuthenticationFailed(body) => assert!(body.contains("bad signature")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn verify_response_without_token_fails() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri(), None);

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let err = harness
        .session
        .execute(&ApiRequest::get("/posts"))
        .await
        .expect_err("authentication should fail");

    match err {
        ClientError::AuthenticationFailed(message) => {
            assert!(message.contains("no token returned"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn auth_payload_fields_reach_the_verify_endpoint() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri(), None);

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .and(body_string_contains("did:key:fake"))
        .and(body_string_contains("n0nce"))
        .respond_with(verify_ok("fresh-token"))
        .expect(1)
        .mount(&server)
        .await;

    let token = harness
        .session
        .authenticate()
        .await
        .expect("authentication should succeed");
    assert_eq!(token, "fresh-token");
}

#[tokio::test]
async fn multipart_retry_carries_a_fresh_complete_body() {
    let server = MockServer::start().await;
    let harness = Harness::new(&server.uri(), Some("stale-token"));

    Mock::given(method("POST"))
        .and(path("/auth/verify"))
        .respond_with(verify_ok("fresh-token"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload/avatar"))
        .and(header("authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&server)
        .await;
    // The retry only matches if the regenerated form still carries the
    // full file content.
    Mock::given(method("POST"))
        .and(path("/upload/avatar"))
        .and(header("authorization", "Bearer fresh-token"))
        .and(body_string_contains("PNGDATA-0123456789"))
        .and(body_string_contains("avatar.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "url": "https://cdn/a.png" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = ApiRequest::post("/upload/avatar").file(FilePart {
        field: "file".to_string(),
        file_name: "avatar.png".to_string(),
        mime: "image/png".to_string(),
        bytes: b"PNGDATA-0123456789".to_vec(),
    });
    let value = harness
        .session
        .execute(&request)
        .await
        .expect("upload should succeed")
        .into_value()
        .expect("json body");

    assert_eq!(value["url"], "https://cdn/a.png");
}

#[tokio::test]
async fn transport_errors_are_not_retried() {
    // Nothing is listening on this port; connection is refused.
    let harness = Harness::new("http://127.0.0.1:9", Some("cached-token"));

    let err = harness
        .session
        .execute(&ApiRequest::get("/posts"))
        .await
        .expect_err("request should fail");

    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(harness.session.signer().auth_calls(), 0);
}
