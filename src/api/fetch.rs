//! reqwest-backed `HttpBackend` (browser fetch when built for wasm32)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

use super::error::{RawResponse, TransportError};
use super::transport::{ApiRequest, FilePart, HttpBackend, RequestBody};

#[derive(Clone, Default)]
pub struct FetchBackend {
    client: reqwest::Client,
}

impl FetchBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl HttpBackend for FetchBackend {
    async fn send(&self, url: &str, request: &ApiRequest, timeout: Duration) -> Result<RawResponse, TransportError> {
        let builder = self
            .client
            .request(request.method.clone(), url)
            .timeout(timeout);

        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(part) => builder.multipart(multipart_form(part)?),
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(RawResponse { status, content_type, body })
    }
}

/// Rebuilt per attempt so a fallback retry sends the same file again
fn multipart_form(file: &FilePart) -> Result<Form, TransportError> {
    let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    if let Some(mime) = &file.mime {
        part = part
            .mime_str(mime)
            .map_err(|e| TransportError::Network(format!("invalid attachment type {mime}: {e}")))?;
    }
    Ok(Form::new().part(file.field.clone(), part))
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}
