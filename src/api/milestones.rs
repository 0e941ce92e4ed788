//! Milestone Repository Client
//!
//! Typed calls for the `/api/milestones` resource.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use super::error::ApiError;
use super::fetch::FetchBackend;
use super::transport::{ApiRequest, FilePart, HttpBackend, Transport};
use crate::config::AppConfig;
use crate::models::{Milestone, MilestonePatch, NewMilestone};

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ').add(b'"').add(b'#').add(b'%').add(b'/').add(b'<')
    .add(b'>').add(b'?').add(b'`').add(b'{').add(b'}');

/// Characters escaped inside a query value
const QUERY_VALUE: &AsciiSet = &PATH_SEGMENT.add(b'&').add(b'=').add(b'+');

pub struct MilestoneApi<B> {
    transport: Transport<B>,
}

impl MilestoneApi<FetchBackend> {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Transport::new(
            FetchBackend::new(),
            config.api_base.clone(),
            config.fallback_origin.clone(),
            config.request_timeout(),
        ))
    }
}

impl<B: HttpBackend> MilestoneApi<B> {
    pub fn new(transport: Transport<B>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport<B> {
        &self.transport
    }

    pub async fn list(&self, project_id: &str) -> Result<Vec<Milestone>, ApiError> {
        let path = format!("/api/milestones?project_id={}", utf8_percent_encode(project_id, QUERY_VALUE));
        let resp = self.transport.send(&ApiRequest::get(path)).await?;
        let rows: Option<Vec<Value>> = resp.json()?;
        Ok(rows.unwrap_or_default().into_iter().filter_map(parse_row).collect())
    }

    pub async fn create(&self, milestone: &NewMilestone) -> Result<Value, ApiError> {
        milestone.validate()?;
        let body = to_json(milestone)?;
        let resp = self.transport.send(&ApiRequest::post_json("/api/milestones", body)).await?;
        resp.json()
    }

    pub async fn update(&self, id: &str, patch: &MilestonePatch) -> Result<Value, ApiError> {
        let body = to_json(patch)?;
        let resp = self.transport.send(&ApiRequest::put_json(milestone_path(id), body)).await?;
        resp.json()
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        let resp = self.transport.send(&ApiRequest::delete(milestone_path(id))).await?;
        resp.json()
    }

    pub async fn upload_attachment(&self, id: &str, file: FilePart) -> Result<Value, ApiError> {
        let path = format!("{}/attachments", milestone_path(id));
        let resp = self.transport.send(&ApiRequest::post_multipart(path, file)).await?;
        resp.json()
    }
}

fn milestone_path(id: &str) -> String {
    format!("/api/milestones/{}", utf8_percent_encode(id, PATH_SEGMENT))
}

/// One unreadable record is logged and left out of the list
fn parse_row(row: Value) -> Option<Milestone> {
    match serde_json::from_value(row) {
        Ok(milestone) => Some(milestone),
        Err(e) => {
            tracing::warn!(error = %e, "skipping unreadable milestone record");
            None
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{json_response, FakeBackend};
    use crate::api::transport::{RequestBody, DEFAULT_TIMEOUT};
    use crate::api::TransportError;
    use futures::executor::block_on;
    use reqwest::Method;
    use serde_json::json;

    fn api(responses: Vec<Result<crate::api::RawResponse, TransportError>>) -> MilestoneApi<FakeBackend> {
        MilestoneApi::new(Transport::new(
            FakeBackend::new(responses),
            "http://localhost:3000",
            "http://127.0.0.1:5000",
            DEFAULT_TIMEOUT,
        ))
    }

    #[test]
    fn test_list_encodes_project_id() {
        let api = api(vec![Ok(json_response(200, json!([
            { "_id": "1", "title": "Design Review", "start_date": "2024-06-01" }
        ])))]);
        let items = block_on(api.list("team a&b")).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Design Review");
        let calls = api.transport().backend().calls();
        assert_eq!(calls[0].url, "http://localhost:3000/api/milestones?project_id=team%20a%26b");
        assert_eq!(calls[0].request.method, Method::GET);
    }

    #[test]
    fn test_list_keeps_good_rows_around_a_bad_one() {
        let api = api(vec![Ok(json_response(200, json!([
            { "_id": "1", "title": null, "progress": "50", "start_date": "2024-06-01" },
            { "title": "no id" },
            { "_id": "3", "title": "Launch", "start_date": "2024-06-20" }
        ])))]);
        let items = block_on(api.list("1234")).unwrap();
        let ids: Vec<_> = items.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(items[0].progress, Some(50.0));
    }

    #[test]
    fn test_list_null_body_is_empty() {
        let api = api(vec![Ok(json_response(200, json!(null)))]);
        assert!(block_on(api.list("1234")).unwrap().is_empty());
    }

    #[test]
    fn test_create_posts_json_body() {
        let api = api(vec![Ok(json_response(201, json!({ "message": "Milestone added!" })))]);
        let new = NewMilestone {
            title: "Design Review".into(),
            start_date: "2024-06-01".into(),
            end_date: None,
            project_id: "1234".into(),
            is_milestone: true,
        };
        block_on(api.create(&new)).unwrap();
        let calls = api.transport().backend().calls();
        assert_eq!(calls[0].request.method, Method::POST);
        assert_eq!(
            calls[0].request.body,
            RequestBody::Json(json!({
                "title": "Design Review",
                "start_date": "2024-06-01",
                "project_id": "1234",
                "is_milestone": true
            }))
        );
    }

    #[test]
    fn test_create_rejects_missing_title_without_calling() {
        let api = api(vec![]);
        let new = NewMilestone {
            title: String::new(),
            start_date: "2024-06-01".into(),
            end_date: None,
            project_id: "1234".into(),
            is_milestone: false,
        };
        assert!(matches!(block_on(api.create(&new)), Err(ApiError::Validation(_))));
        assert!(api.transport().backend().calls().is_empty());
    }

    #[test]
    fn test_update_and_delete_paths() {
        let api = api(vec![
            Ok(json_response(200, json!({}))),
            Ok(json_response(200, json!({ "message": "Milestone deleted!" }))),
        ]);
        block_on(api.update("665f/1", &MilestonePatch::completed(true))).unwrap();
        block_on(api.delete("665f")).unwrap();
        let calls = api.transport().backend().calls();
        assert_eq!(calls[0].url, "http://localhost:3000/api/milestones/665f%2F1");
        assert_eq!(calls[0].request.method, Method::PUT);
        assert_eq!(calls[0].request.body, RequestBody::Json(json!({ "completed": true })));
        assert_eq!(calls[1].request.method, Method::DELETE);
    }

    #[test]
    fn test_server_error_message_is_extracted() {
        let api = api(vec![Ok(json_response(400, json!({ "error": "title and start_date required" })))]);
        let err = block_on(api.update("1", &MilestonePatch::default())).unwrap_err();
        assert_eq!(err, ApiError::Http { status: 400, message: "title and start_date required".into() });
        assert_eq!(err.to_string(), "title and start_date required");
    }

    #[test]
    fn test_upload_is_multipart_file_field() {
        let api = api(vec![Ok(json_response(200, json!({ "filename": "a.txt" })))]);
        let part = FilePart {
            field: "file".into(),
            file_name: "a.txt".into(),
            mime: None,
            bytes: b"hello".to_vec(),
        };
        block_on(api.upload_attachment("42", part.clone())).unwrap();
        let calls = api.transport().backend().calls();
        assert_eq!(calls[0].url, "http://localhost:3000/api/milestones/42/attachments");
        assert_eq!(calls[0].request.body, RequestBody::Multipart(part));
    }
}
