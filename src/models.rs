//! Frontend Models
//!
//! Data structures matching the milestone REST backend, plus the
//! display-only calendar event shape derived from them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::ApiError;

/// Milestone priority
///
/// Unknown strings from the server are kept verbatim in `Other` so an
/// update never rewrites a value the client does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    pub const CHOICES: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(s) => s,
        }
    }

    /// Sort rank: High first, unknown values last
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::Other(_) => 3,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Other(s),
        }
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}

/// Checklist entry inside a milestone, identified by position only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), done: false }
    }
}

/// Milestone record as returned by `GET /api/milestones`
///
/// Everything except the id is optional on the wire; defaults are applied
/// by the adapter, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_title")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_milestone: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_progress", skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
    /// Kept as sent; some backends store it as a number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Value>,
}

/// Accept both string ids and numeric ids
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid milestone id: {other}"))),
    }
}

/// `null` and non-string titles never fail a record
fn deserialize_title<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Numbers or numeric strings; anything else reads as missing
fn deserialize_progress<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Fixed colour pair of a rendered event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventColor {
    pub background: &'static str,
    pub border: &'static str,
}

impl EventColor {
    pub const TASK: EventColor = EventColor { background: "#f97316", border: "transparent" };
    pub const HIGH: EventColor = EventColor { background: "#ef4444", border: "transparent" };
    pub const LOW: EventColor = EventColor { background: "#34d399", border: "transparent" };
    pub const MEDIUM: EventColor = EventColor { background: "#2563eb", border: "transparent" };
}

/// Extended fields carried by a display record, defaults applied
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventProps {
    pub is_milestone: bool,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
    pub progress: u8,
    pub notes: String,
    pub attachments: Vec<Value>,
    pub reminder_time: Option<String>,
    pub subtasks: Vec<Subtask>,
}

/// Calendar display record (UI only, never sent back as-is)
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub color: EventColor,
    pub props: EventProps,
}

/// Body of `POST /api/milestones`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMilestone {
    pub title: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub project_id: String,
    pub is_milestone: bool,
}

impl NewMilestone {
    /// Title and start date are required before anything is sent
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("title is required".into()));
        }
        if self.start_date.trim().is_empty() {
            return Err(ApiError::Validation("start date is required".into()));
        }
        Ok(())
    }
}

/// Body of `PUT /api/milestones/{id}`; absent fields are left untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MilestonePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `Some(None)` serializes as an explicit null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
}

impl MilestonePatch {
    pub fn dates(start: String, end: String) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}

/// Human label for an attachment reference (plain string or object)
pub fn attachment_label(attachment: &Value) -> String {
    match attachment {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["filename", "name", "url", "path"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| attachment.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_milestone_accepts_mongo_id() {
        let m: Milestone = serde_json::from_value(json!({
            "_id": "665f1c",
            "title": "Kickoff",
            "start_date": "2024-06-01",
            "priority": "High"
        }))
        .unwrap();
        assert_eq!(m.id, "665f1c");
        assert_eq!(m.priority, Some(Priority::High));
        assert_eq!(m.subtasks, None);
    }

    #[test]
    fn test_milestone_accepts_numeric_id_and_nulls() {
        let m: Milestone = serde_json::from_value(json!({
            "id": 42,
            "title": "Demo",
            "end_date": null,
            "reminder_time": null
        }))
        .unwrap();
        assert_eq!(m.id, "42");
        assert_eq!(m.end_date, None);
    }

    #[test]
    fn test_milestone_tolerates_null_title_and_string_progress() {
        let m: Milestone = serde_json::from_value(json!({
            "_id": "a1",
            "title": null,
            "progress": "50"
        }))
        .unwrap();
        assert_eq!(m.title, "");
        assert_eq!(m.progress, Some(50.0));

        let m: Milestone = serde_json::from_value(json!({ "_id": "a2", "progress": null })).unwrap();
        assert_eq!(m.progress, None);
        let m: Milestone = serde_json::from_value(json!({ "_id": "a3", "progress": "half" })).unwrap();
        assert_eq!(m.progress, None);
    }

    #[test]
    fn test_unknown_priority_is_preserved() {
        let p: Priority = serde_json::from_value(json!("Urgent")).unwrap();
        assert_eq!(p, Priority::Other("Urgent".into()));
        assert_eq!(serde_json::to_value(&p).unwrap(), json!("Urgent"));
    }

    #[test]
    fn test_date_patch_only_carries_dates() {
        let patch = MilestonePatch::dates("2024-06-03".into(), "2024-06-04".into());
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "start_date": "2024-06-03", "end_date": "2024-06-04" })
        );
    }

    #[test]
    fn test_explicit_null_reminder() {
        let patch = MilestonePatch { reminder_time: Some(None), ..Default::default() };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "reminder_time": null }));
    }

    #[test]
    fn test_new_milestone_validation() {
        let mut m = NewMilestone {
            title: "  ".into(),
            start_date: "2024-06-01".into(),
            end_date: None,
            project_id: "1234".into(),
            is_milestone: true,
        };
        assert!(matches!(m.validate(), Err(ApiError::Validation(_))));
        m.title = "Design Review".into();
        assert!(m.validate().is_ok());
        m.start_date = String::new();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_attachment_label() {
        assert_eq!(attachment_label(&json!("brief.pdf")), "brief.pdf");
        assert_eq!(attachment_label(&json!({ "filename": "a.png", "url": "/u/a.png" })), "a.png");
        assert_eq!(attachment_label(&json!(7)), "7");
    }
}
