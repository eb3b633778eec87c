//! Authenticated session: wraps every outbound API call with the
//! bearer-token and retry-on-401 policy.
//!
//! Per call: load the cached token (or run the authentication exchange),
//! issue the request, and on `401 Unauthorized` re-authenticate and retry
//! exactly once. The concrete HTTP request is rebuilt from an [`ApiRequest`]
//! description on every attempt, so a retried multipart upload carries a
//! fresh body instead of a consumed stream.

use reqwest::{Client, Method, StatusCode, header};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ClientError;
use crate::signer::Signer;
use crate::token::TokenStore;

/// Description of one API request.
///
/// Paths are relative to the configured base URL and may carry a query
/// string. Caller-supplied headers are applied after the authorization
/// header, so they win for non-auth concerns.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    headers: Vec<(String, String)>,
    file: Option<FilePart>,
}

impl ApiRequest {
    /// Create a request with an explicit method.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
            file: None,
        }
    }

    /// Create a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Create a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Create a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Create a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a caller header. Applied after the authorization header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a file to send as a multipart form.
    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.file = Some(part);
        self
    }

    /// The request path relative to the base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// An uploaded file, retained as bytes so the multipart form can be rebuilt
/// for a retry.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported in the form.
    pub file_name: String,
    /// MIME type of the content.
    pub mime: String,
    /// File content.
    pub bytes: Vec<u8>,
}

/// A fully materialized API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    /// The HTTP status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RequestFailed`] carrying the raw server body
    /// for non-2xx statuses, or when a success body is not valid JSON.
    pub fn into_value(self) -> Result<Value, ClientError> {
        let status = self.status.as_u16();
        if !self.status.is_success() {
            return Err(ClientError::RequestFailed {
                status,
                body: self.body,
            });
        }
        serde_json::from_str(&self.body).map_err(|_| ClientError::RequestFailed {
            status,
            body: self.body,
        })
    }
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    success: bool,
    token: Option<String>,
}

/// Authenticated API session.
///
/// Owns the token lifecycle: load-from-disk, exchange-for-token via the
/// remote verification endpoint, persist-to-disk. The signer is only used
/// for the authentication exchange; the token is never shared with it.
#[derive(Debug)]
pub struct Session<S: Signer> {
    config: Config,
    http: Client,
    tokens: TokenStore,
    signer: S,
}

impl<S: Signer> Session<S> {
    /// Create a session with the default token store locations.
    #[must_use]
    pub fn new(config: Config, signer: S) -> Self {
        let tokens = TokenStore::from_override(config.token_path.as_deref());
        Self::with_token_store(config, signer, tokens)
    }

    /// Create a session with an explicit token store.
    #[must_use]
    pub fn with_token_store(config: Config, signer: S, tokens: TokenStore) -> Self {
        Self {
            config,
            http: Client::new(),
            tokens,
            signer,
        }
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The signer backing this session.
    #[must_use]
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Execute a request under the bearer-token policy.
    ///
    /// Ensures a token is present (running the authentication exchange if
    /// none is cached), issues the request, and on a `401` re-authenticates
    /// and retries exactly once. The retry's response is returned as-is,
    /// including a second `401`.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails or the request cannot be
    /// sent; non-2xx business responses are returned, not errors.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let token = match self.tokens.load() {
            Some(token) => token,
            None => self.authenticate().await?,
        };

        let response = self.send(request, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(path = %request.path, "token rejected, re-authenticating");
        let token = self.authenticate().await?;
        self.send(request, &token).await
    }

    /// Run the authentication exchange and persist the resulting token.
    ///
    /// Opens a scoped signer connection for the auth payload, submits it to
    /// the verification endpoint via an unauthenticated POST, and writes the
    /// returned token over any prior value before returning it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthenticationFailed`] if the endpoint rejects
    /// the payload or returns no token, or a signer/transport error from the
    /// exchange itself.
    pub async fn authenticate(&self) -> Result<String, ClientError> {
        info!(url = %self.config.api_url, "authenticating");
        let payload = self.signer.auth_payload().await?;

        let response = self
            .http
            .post(format!("{}/auth/verify", self.config.api_url))
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::AuthenticationFailed(body));
        }

        let verify: VerifyResponse = serde_json::from_str(&body).map_err(|e| {
            ClientError::AuthenticationFailed(format!("malformed verify response: {e}"))
        })?;
        let token = match (verify.success, verify.token) {
            (true, Some(token)) if !token.is_empty() => token,
            _ => {
                return Err(ClientError::AuthenticationFailed(
                    "no token returned".to_string(),
                ));
            }
        };

        self.tokens.save(&token)?;
        debug!(path = %self.tokens.write_path().display(), "token saved");
        Ok(token)
    }

    /// Build and send one concrete HTTP request from the description.
    async fn send(&self, request: &ApiRequest, token: &str) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{}", self.config.api_url, request.path);
        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));

        if let Some(part) = &request.file {
            let form = reqwest::multipart::Form::new().part(
                part.field.clone(),
                reqwest::multipart::Part::bytes(part.bytes.clone())
                    .file_name(part.file_name.clone())
                    .mime_str(&part.mime)
                    .map_err(|e| ClientError::Config(format!("invalid MIME type: {e}")))?,
            );
            builder = builder.multipart(form);
        } else if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_accumulates() {
        let request = ApiRequest::post("/posts")
            .json(serde_json::json!({ "content": "hi" }))
            .header("Accept", "application/json");
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path(), "/posts");
        assert!(request.body.is_some());
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn test_request_clone_retains_file_bytes() {
        let request = ApiRequest::post("/upload/avatar").file(FilePart {
            field: "file".to_string(),
            file_name: "avatar.png".to_string(),
            mime: "image/png".to_string(),
            bytes: vec![1, 2, 3, 4],
        });
        let cloned = request.clone();
        let part = cloned.file.expect("file part");
        assert_eq!(part.bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_response_success_into_value() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: r#"{"ok":true}"#.to_string(),
        };
        let value = response.into_value().expect("should parse");
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_response_failure_into_value_carries_body() {
        let response = ApiResponse {
            status: StatusCode::NOT_FOUND,
            body: "listing not found".to_string(),
        };
        let err = response.into_value().expect_err("should fail");
        match err {
            ClientError::RequestFailed { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "listing not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_response_non_json_success_is_request_failed() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: "<html>gateway</html>".to_string(),
        };
        let err = response.into_value().expect_err("should fail");
        assert!(matches!(err, ClientError::RequestFailed { status: 200, .. }));
    }

    #[test]
    fn test_verify_response_defaults() {
        let verify: VerifyResponse = serde_json::from_str(r#"{"token":"t"}"#).expect("parse");
        assert!(!verify.success);
        assert_eq!(verify.token.as_deref(), Some("t"));
    }
}
