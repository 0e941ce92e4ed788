//! Transport Shim
//!
//! Sends a request to the page origin first. When the answer looks like a
//! routing miss (404 or an HTML page, typically a dev proxy serving its
//! own index), the identical request is retried once against the
//! configured fallback origin.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::error::{RawResponse, TransportError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(7);

/// A single file sent as one multipart field
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(FilePart),
}

/// Per-call overrides
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path on the API host, e.g. `/api/milestones`
    pub path: String,
    pub body: RequestBody,
    pub options: RequestOptions,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            options: RequestOptions::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, RequestBody::Empty)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, RequestBody::Empty)
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path, RequestBody::Json(body))
    }

    pub fn put_json(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path, RequestBody::Json(body))
    }

    pub fn post_multipart(path: impl Into<String>, part: FilePart) -> Self {
        Self::new(Method::POST, path, RequestBody::Multipart(part))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }
}

/// One HTTP round trip. Any response, whatever its status, is `Ok`;
/// only network-level failures are errors.
#[async_trait(?Send)]
pub trait HttpBackend {
    async fn send(&self, url: &str, request: &ApiRequest, timeout: Duration) -> Result<RawResponse, TransportError>;
}

pub struct Transport<B> {
    backend: B,
    primary_base: String,
    fallback_origin: String,
    default_timeout: Duration,
}

impl<B: HttpBackend> Transport<B> {
    pub fn new(backend: B, primary_base: impl Into<String>, fallback_origin: impl Into<String>, default_timeout: Duration) -> Self {
        Self {
            backend,
            primary_base: primary_base.into(),
            fallback_origin: fallback_origin.into(),
            default_timeout,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Send with at most one fallback attempt, taken only when the first
    /// attempt failed with a routing miss
    pub async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let timeout = self.timeout_for(request);
        let url = join_url(&self.primary_base, &request.path);
        tracing::debug!(method = %request.method, %url, "sending request");

        let first = self.backend.send(&url, request, timeout).await?;
        if !first.is_routing_miss() {
            return into_result(first);
        }

        let fallback = join_url(&self.fallback_origin, &request.path);
        tracing::warn!(status = first.status, url = %fallback, "routing miss, retrying against fallback origin");
        let second = self.backend.send(&fallback, request, timeout).await?;
        into_result(second)
    }

    /// Send straight to the fallback origin, skipping the page origin
    pub async fn send_to_fallback(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let url = join_url(&self.fallback_origin, &request.path);
        tracing::debug!(method = %request.method, %url, "sending request to fallback origin");
        let resp = self.backend.send(&url, request, self.timeout_for(request)).await?;
        into_result(resp)
    }

    fn timeout_for(&self, request: &ApiRequest) -> Duration {
        request.options.timeout.unwrap_or(self.default_timeout)
    }
}

fn into_result(resp: RawResponse) -> Result<RawResponse, TransportError> {
    if resp.is_success() {
        Ok(resp)
    } else {
        Err(TransportError::Status(resp))
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::fake::{html, json_response, FakeBackend};
    use futures::executor::block_on;
    use serde_json::json;

    const PRIMARY: &str = "http://localhost:3000";
    const FALLBACK: &str = "http://127.0.0.1:5000";

    fn transport(backend: FakeBackend) -> Transport<FakeBackend> {
        Transport::new(backend, PRIMARY, FALLBACK, DEFAULT_TIMEOUT)
    }

    #[test]
    fn test_success_makes_one_call() {
        let t = transport(FakeBackend::new(vec![Ok(json_response(200, json!([])))]));
        let resp = block_on(t.send(&ApiRequest::get("/api/milestones"))).unwrap();
        assert_eq!(resp.status, 200);
        let calls = t.backend().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "http://localhost:3000/api/milestones");
    }

    #[test]
    fn test_404_retries_once_against_fallback_with_same_request() {
        let t = transport(FakeBackend::new(vec![
            Ok(json_response(404, json!({ "error": "not found" }))),
            Ok(json_response(201, json!({ "message": "Milestone added!" }))),
        ]));
        let request = ApiRequest::post_json("/api/milestones", json!({ "title": "Design Review" }));
        let resp = block_on(t.send(&request)).unwrap();
        assert_eq!(resp.status, 201);

        let calls = t.backend().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].url, "http://127.0.0.1:5000/api/milestones");
        assert_eq!(calls[1].request, calls[0].request);
        assert_eq!(calls[1].request.method, Method::POST);
    }

    #[test]
    fn test_html_error_page_triggers_fallback() {
        let t = transport(FakeBackend::new(vec![
            Ok(html(500, "<html>proxy error</html>")),
            Ok(json_response(200, json!([]))),
        ]));
        assert!(block_on(t.send(&ApiRequest::get("/api/milestones"))).is_ok());
        assert_eq!(t.backend().calls().len(), 2);
    }

    #[test]
    fn test_ok_html_page_is_returned_without_fallback() {
        let t = transport(FakeBackend::new(vec![
            Ok(html(200, "<html>index</html>")),
            Ok(html(200, "<html>other</html>")),
        ]));
        let resp = block_on(t.send(&ApiRequest::get("/api/milestones"))).unwrap();
        let calls = t.backend().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "http://localhost:3000/api/milestones");
        assert_eq!(
            resp.json::<serde_json::Value>().unwrap_err(),
            ApiError::UnexpectedBody { excerpt: "<html>index</html>".into() }
        );
    }

    #[test]
    fn test_500_json_propagates_without_fallback() {
        let t = transport(FakeBackend::new(vec![Ok(json_response(500, json!({ "error": "boom" })))]));
        let err = block_on(t.send(&ApiRequest::get("/api/milestones"))).unwrap_err();
        assert_eq!(err.response().map(|r| r.status), Some(500));
        assert_eq!(t.backend().calls().len(), 1);
    }

    #[test]
    fn test_network_error_propagates_without_fallback() {
        let t = transport(FakeBackend::new(vec![Err(TransportError::Network("connection refused".into()))]));
        let err = block_on(t.send(&ApiRequest::delete("/api/milestones/1"))).unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
        assert_eq!(t.backend().calls().len(), 1);
    }

    #[test]
    fn test_fallback_failure_is_not_retried_again() {
        let t = transport(FakeBackend::new(vec![
            Ok(html(404, "<html>missing</html>")),
            Ok(html(404, "<html>still missing</html>")),
        ]));
        let err = block_on(t.send(&ApiRequest::get("/api/milestones"))).unwrap_err();
        assert_eq!(err.response().map(|r| r.status), Some(404));
        assert_eq!(t.backend().calls().len(), 2);
    }

    #[test]
    fn test_per_call_timeout_overrides_default() {
        let t = transport(FakeBackend::new(vec![Ok(json_response(200, json!({})))]));
        let request = ApiRequest::get("/api/milestones").with_timeout(Duration::from_secs(2));
        block_on(t.send(&request)).unwrap();
        assert_eq!(t.backend().calls()[0].timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://a/", "/api/x"), "http://a/api/x");
        assert_eq!(join_url("http://a", "api/x"), "http://a/api/x");
    }
}
