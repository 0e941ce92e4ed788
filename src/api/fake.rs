//! Scripted `HttpBackend` for tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::error::{RawResponse, TransportError};
use super::transport::{ApiRequest, HttpBackend};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub request: ApiRequest,
    pub timeout: Duration,
}

/// Replays queued results in order and records every call
pub struct FakeBackend {
    responses: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl FakeBackend {
    pub fn new(responses: Vec<Result<RawResponse, TransportError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl HttpBackend for FakeBackend {
    async fn send(&self, url: &str, request: &ApiRequest, timeout: Duration) -> Result<RawResponse, TransportError> {
        self.calls.borrow_mut().push(RecordedCall {
            url: url.to_string(),
            request: request.clone(),
            timeout,
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".into())))
    }
}

pub fn json_response(status: u16, body: Value) -> RawResponse {
    RawResponse {
        status,
        content_type: Some("application/json".into()),
        body: body.to_string().into_bytes(),
    }
}

pub fn html(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status,
        content_type: Some("text/html; charset=utf-8".into()),
        body: body.as_bytes().to_vec(),
    }
}
