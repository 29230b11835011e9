use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Descriptive fields attached to a video submission.
///
/// Sent as multipart text fields on every video chunk and persisted
/// locally as the user's form defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub weapon: String,
    #[serde(default)]
    pub map_name: String,
}

impl VideoMetadata {
    /// Returns the wire name of the first blank field, if any.
    pub fn first_missing(&self) -> Option<&'static str> {
        [
            ("account_name", &self.account_name),
            ("game_mode", &self.game_mode),
            ("weapon", &self.weapon),
            ("map_name", &self.map_name),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Server-side processing state of a submitted video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VideoStatus {
    Completed,
    Failed,
    Processing,
    /// Any status this client does not know about, kept verbatim.
    Other(String),
}

impl VideoStatus {
    pub fn as_str(&self) -> &str {
        match self {
            VideoStatus::Completed => "COMPLETED",
            VideoStatus::Failed => "FAILED",
            VideoStatus::Processing => "PROCESSING",
            VideoStatus::Other(s) => s,
        }
    }
}

impl From<String> for VideoStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "COMPLETED" => VideoStatus::Completed,
            "FAILED" => VideoStatus::Failed,
            "PROCESSING" => VideoStatus::Processing,
            _ => VideoStatus::Other(s),
        }
    }
}

impl From<VideoStatus> for String {
    fn from(status: VideoStatus) -> Self {
        match status {
            VideoStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One entry of the video catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub weapon: String,
    #[serde(default)]
    pub map_name: String,
    pub status: VideoStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Accepts numeric or string ids (the service has used both).
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_metadata() -> VideoMetadata {
        VideoMetadata {
            account_name: "ghost".into(),
            game_mode: "Search and Destroy".into(),
            weapon: "Kar98k".into(),
            map_name: "Rust".into(),
        }
    }

    #[test]
    fn metadata_complete() {
        assert_eq!(complete_metadata().first_missing(), None);
    }

    #[test]
    fn metadata_blank_field_detected() {
        let meta = VideoMetadata {
            weapon: "   ".into(),
            ..complete_metadata()
        };
        assert_eq!(meta.first_missing(), Some("weapon"));
    }

    #[test]
    fn metadata_default_reports_first_field() {
        assert_eq!(VideoMetadata::default().first_missing(), Some("account_name"));
    }

    #[test]
    fn metadata_camel_case_persistence() {
        let json = serde_json::to_string(&complete_metadata()).unwrap();
        assert!(json.contains("accountName"));
        assert!(json.contains("mapName"));
    }

    #[test]
    fn status_known_values() {
        let s: VideoStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(s, VideoStatus::Completed);
        let s: VideoStatus = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(s, VideoStatus::Processing);
    }

    #[test]
    fn status_unknown_kept_verbatim() {
        let s: VideoStatus = serde_json::from_str("\"QUEUED\"").unwrap();
        assert_eq!(s, VideoStatus::Other("QUEUED".into()));
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"QUEUED\"");
        assert_eq!(s.to_string(), "QUEUED");
    }

    #[test]
    fn record_numeric_id() {
        let json = r#"{"id":17,"account_name":"ghost","game_mode":"TDM","weapon":"MP40",
            "map_name":"Rust","status":"FAILED","created_at":"2024-09-01T10:00:00",
            "updated_at":"2024-09-01T10:05:00"}"#;
        let rec: VideoRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, "17");
        assert_eq!(rec.status, VideoStatus::Failed);
    }

    #[test]
    fn record_string_id() {
        let json = r#"{"id":"a1b2","status":"COMPLETED"}"#;
        let rec: VideoRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, "a1b2");
        assert!(rec.account_name.is_empty());
    }

    #[test]
    fn record_rejects_object_id() {
        let json = r#"{"id":{"x":1},"status":"COMPLETED"}"#;
        assert!(serde_json::from_str::<VideoRecord>(json).is_err());
    }
}
