//! API Error Types
//!
//! `TransportError` is what the shim sees on the wire; `ApiError` is what
//! UI actions turn into an alert.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Longest body excerpt quoted in an error message
const EXCERPT_CHARS: usize = 200;

/// A response as read off the wire, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("text/html"))
    }

    pub fn is_json_content(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// A failed answer that came from a static server rather than the API:
    /// 404, or an HTML error page. A 2xx answer is never a miss.
    pub fn is_routing_miss(&self) -> bool {
        !self.is_success() && (self.status == 404 || self.is_html())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON; an empty body decodes from `null`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let parsed = if self.body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&self.body)
        };
        parsed.map_err(|_| ApiError::UnexpectedBody { excerpt: excerpt(&self.text()) })
    }
}

/// Failures of a single request attempt
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("server responded with status {}", .0.status)]
    Status(RawResponse),
}

impl TransportError {
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            TransportError::Status(resp) => Some(resp),
            _ => None,
        }
    }
}

/// Errors surfaced to UI actions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Unexpected non-JSON response from server: {excerpt}")]
    UnexpectedBody { excerpt: String },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Browser(String),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(msg) => ApiError::Network(msg),
            TransportError::Timeout => ApiError::Timeout,
            TransportError::Status(resp) => ApiError::Http {
                status: resp.status,
                message: error_message(&resp),
            },
        }
    }
}

/// Message for a failed response: the body's `error` or `message` field,
/// else the body itself, else the status line
pub fn error_message(resp: &RawResponse) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(&resp.body) {
        let field = ["error", "message"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str));
        if let Some(msg) = field {
            return msg.to_string();
        }
        if !value.is_null() {
            return value.to_string();
        }
    }
    let text = resp.text();
    let text = text.trim();
    if !text.is_empty() {
        return excerpt(text);
    }
    status_line(resp.status)
}

pub fn status_line(status: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason());
    match reason {
        Some(reason) => format!("Status {status} {reason}"),
        None => format!("Status {status}"),
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}
