//! REST API Client
//!
//! Bindings to the milestone backend, organized by layer:
//! transport shim, repository calls, demo endpoints.

mod demo;
mod error;
mod fetch;
mod milestones;
mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use error::{error_message, status_line, ApiError, RawResponse, TransportError};
pub use fetch::FetchBackend;
pub use milestones::MilestoneApi;
pub use transport::{join_url, ApiRequest, FilePart, HttpBackend, RequestBody, RequestOptions, Transport, DEFAULT_TIMEOUT};

/// Client for the app's configured backend
pub fn client(config: &crate::config::AppConfig) -> MilestoneApi<FetchBackend> {
    MilestoneApi::from_config(config)
}
