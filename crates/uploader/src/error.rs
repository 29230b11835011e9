//! Upload and submission error types.

use std::fmt;

use killcam_protocol::Stream;
use killcam_transfer::TransferError;

/// Errors from a single request or a single file's upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("{stream} chunk {chunk} rejected ({status}): {detail}")]
    ChunkRejected {
        stream: Stream,
        chunk: u32,
        status: u16,
        detail: String,
    },

    #[error("{stream} chunk {chunk} request failed: {source}")]
    ChunkRequest {
        stream: Stream,
        chunk: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stream} chunk {chunk} failed ({status}) with an unreadable error body: {source}")]
    ChunkErrorBody {
        stream: Stream,
        chunk: u32,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("{stream} chunk {chunk} acknowledgment is not valid JSON: {source}")]
    ChunkAck {
        stream: Stream,
        chunk: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("{stream} upload finished without a server filename")]
    MissingFilename { stream: Stream },

    #[error("processing request rejected ({status}): {detail}")]
    ProcessRejected { status: u16, detail: String },

    #[error("processing request failed ({status}) with an unreadable error body: {source}")]
    ProcessErrorBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("processing response is not valid JSON: {0}")]
    ProcessResponse(#[source] serde_json::Error),

    #[error("video catalog unavailable ({status})")]
    CatalogUnavailable { status: u16 },

    #[error("video catalog response is not valid JSON: {0}")]
    CatalogResponse(#[source] serde_json::Error),

    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),
}

impl UploadError {
    /// Chunk index the failure is attributed to, if any.
    pub fn chunk(&self) -> Option<u32> {
        match self {
            UploadError::ChunkRejected { chunk, .. }
            | UploadError::ChunkRequest { chunk, .. }
            | UploadError::ChunkErrorBody { chunk, .. }
            | UploadError::ChunkAck { chunk, .. } => Some(*chunk),
            _ => None,
        }
    }

    /// Server-provided `detail`, if the server sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            UploadError::ChunkRejected { detail, .. }
            | UploadError::ProcessRejected { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::ChunkRejected { status, .. }
            | UploadError::ChunkErrorBody { status, .. }
            | UploadError::ProcessRejected { status, .. }
            | UploadError::ProcessErrorBody { status, .. }
            | UploadError::CatalogUnavailable { status } => Some(*status),
            _ => None,
        }
    }
}

/// Pipeline stage a submission failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validation,
    Music,
    Video,
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validation => f.write_str("validation"),
            Stage::Music => f.write_str("music upload"),
            Stage::Video => f.write_str("video upload"),
            Stage::Finalize => f.write_str("finalize"),
        }
    }
}

/// A failed submission; surfaces once, tagged with its stage.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("no video selected")]
    MissingVideo,

    #[error("metadata field `{0}` is required")]
    IncompleteMetadata(&'static str),

    #[error("invalid media: {0}")]
    Media(#[source] TransferError),

    #[error("music upload failed: {0}")]
    Music(#[source] UploadError),

    #[error("video upload failed: {0}")]
    Video(#[source] UploadError),

    #[error("finalize failed: {0}")]
    Finalize(#[source] UploadError),
}

impl SubmitError {
    pub fn stage(&self) -> Stage {
        match self {
            SubmitError::MissingVideo
            | SubmitError::IncompleteMetadata(_)
            | SubmitError::Media(_) => Stage::Validation,
            SubmitError::Music(_) => Stage::Music,
            SubmitError::Video(_) => Stage::Video,
            SubmitError::Finalize(_) => Stage::Finalize,
        }
    }

    pub fn chunk(&self) -> Option<u32> {
        self.upload_error().and_then(UploadError::chunk)
    }

    pub fn detail(&self) -> Option<&str> {
        self.upload_error().and_then(UploadError::detail)
    }

    fn upload_error(&self) -> Option<&UploadError> {
        match self {
            SubmitError::Music(e) | SubmitError::Video(e) | SubmitError::Finalize(e) => Some(e),
            _ => None,
        }
    }
}
