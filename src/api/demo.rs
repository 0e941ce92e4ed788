//! Demo Data Endpoints
//!
//! `reset-demo` is user triggered; `seed-demo` is fired once per browser.

use serde_json::{json, Value};

use super::error::{ApiError, RawResponse};
use super::milestones::MilestoneApi;
use super::transport::{ApiRequest, HttpBackend};

impl<B: HttpBackend> MilestoneApi<B> {
    /// Wipe and reseed the demo milestones of a project
    pub async fn reset_demo(&self, project_id: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::post_json("/api/reset-demo", json!({ "project_id": project_id }));
        let resp = self.transport().send(&request).await?;
        require_json(&resp)?;
        resp.json()
    }

    /// Seed demo data on the backend origin directly
    pub async fn seed_demo(&self) -> Result<Value, ApiError> {
        let request = ApiRequest::post_json("/api/seed-demo", json!({}));
        let resp = self.transport().send_to_fallback(&request).await?;
        resp.json()
    }
}

/// A 2xx answer without a JSON content type is still a failure here
fn require_json(resp: &RawResponse) -> Result<(), ApiError> {
    if resp.is_json_content() {
        return Ok(());
    }
    Err(ApiError::UnexpectedBody {
        excerpt: resp.text().chars().take(200).collect(),
    })
}
