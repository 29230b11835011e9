use serde::{Deserialize, Serialize};

use crate::types::VideoRecord;

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Body of a successful chunk upload.
///
/// Intermediate chunks only need to parse; the final chunk carries the
/// server-assigned `filename` (plus whatever else the server adds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkAck(pub serde_json::Value);

impl ChunkAck {
    /// Server-assigned filename, present on the final chunk's response.
    pub fn filename(&self) -> Option<&str> {
        self.0.get("filename").and_then(serde_json::Value::as_str)
    }

    pub fn into_body(self) -> serde_json::Value {
        self.0
    }
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Human-readable detail text.
    ///
    /// String details are returned verbatim; structured ones (validation
    /// error lists) are rendered as compact JSON.
    pub fn detail_text(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "no detail provided".into(),
            other => other.to_string(),
        }
    }
}

/// Catalog response from `GET /videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Finalize request: both uploads are complete, start processing.
///
/// `music_filename` serializes as `null` when no music was uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessVideoRequest {
    pub video_filename: String,
    pub music_filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_ack_filename_present() {
        let ack: ChunkAck =
            serde_json::from_str(r#"{"filename":"clip_123.mp4","chunks":3}"#).unwrap();
        assert_eq!(ack.filename(), Some("clip_123.mp4"));
        assert_eq!(ack.0["chunks"], 3);
    }

    #[test]
    fn chunk_ack_accepts_non_object_bodies() {
        let ack: ChunkAck = serde_json::from_str(r#""received""#).unwrap();
        assert_eq!(ack.filename(), None);

        let ack: ChunkAck = serde_json::from_str("null").unwrap();
        assert_eq!(ack.filename(), None);
    }

    #[test]
    fn chunk_ack_rejects_invalid_json() {
        assert!(serde_json::from_str::<ChunkAck>("<html>").is_err());
    }

    #[test]
    fn error_body_string_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"disk full"}"#).unwrap();
        assert_eq!(body.detail_text(), "disk full");
    }

    #[test]
    fn error_body_structured_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","weapon"],"msg":"field required"}]}"#)
                .unwrap();
        let text = body.detail_text();
        assert!(text.contains("field required"), "got: {text}");
    }

    #[test]
    fn error_body_missing_detail() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.detail_text(), "no detail provided");
    }

    #[test]
    fn process_request_null_music() {
        let req = ProcessVideoRequest {
            video_filename: "v.mp4".into(),
            music_filename: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"video_filename":"v.mp4","music_filename":null}"#);
    }

    #[test]
    fn process_request_with_music() {
        let req = ProcessVideoRequest {
            video_filename: "v.mp4".into(),
            music_filename: Some("m.mp3".into()),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["music_filename"], "m.mp3");
    }

    #[test]
    fn video_list_missing_videos_is_empty() {
        let list: VideoList = serde_json::from_str("{}").unwrap();
        assert!(list.videos.is_empty());
    }
}
