//! HTTP transport using `reqwest` multipart uploads.

use killcam_protocol::constants::{PROCESS_VIDEO_PATH, VIDEOS_PATH, fields};
use killcam_protocol::{ChunkAck, ErrorBody, ProcessVideoRequest, Stream, VideoList};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::UploadError;
use crate::transport::{ChunkForm, TransportFuture, UploadTransport};

/// Default service address when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Talks to the clip-processing service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for the service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Uses a preconfigured client (proxies, timeouts, TLS roots).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn chunk_request(
        &self,
        stream: Stream,
        form: &ChunkForm,
    ) -> Result<reqwest::RequestBuilder, UploadError> {
        let chunk = form.chunk_number;
        let part = Part::bytes(form.data.clone())
            .file_name(form.file_name.clone())
            .mime_str(&form.mime)
            .map_err(|source| UploadError::ChunkRequest {
                stream,
                chunk,
                source,
            })?;

        let mut multipart = Form::new().part(fields::FILE, part);
        for (name, value) in form.text_fields() {
            multipart = multipart.text(name, value);
        }
        Ok(self.http.post(self.url(stream.chunk_path())).multipart(multipart))
    }
}

impl UploadTransport for HttpTransport {
    fn send_chunk(&self, stream: Stream, form: &ChunkForm) -> TransportFuture<'_, ChunkAck> {
        let chunk = form.chunk_number;
        let request = self.chunk_request(stream, form);

        Box::pin(async move {
            let request_err = |source: reqwest::Error| UploadError::ChunkRequest {
                stream,
                chunk,
                source,
            };
            let resp = request?.send().await.map_err(request_err)?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await.map_err(request_err)?;
            debug!(%stream, chunk, status, bytes = body.len(), "chunk response");
            parse_chunk_response(stream, chunk, status, &body)
        })
    }

    fn process_video(
        &self,
        request: &ProcessVideoRequest,
    ) -> TransportFuture<'_, serde_json::Value> {
        let request = self.http.post(self.url(PROCESS_VIDEO_PATH)).json(request);

        Box::pin(async move {
            let resp = request.send().await?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await?;
            debug!(status, "process-video response");
            parse_process_response(status, &body)
        })
    }

    fn list_videos(&self) -> TransportFuture<'_, VideoList> {
        let request = self.http.get(self.url(VIDEOS_PATH));

        Box::pin(async move {
            let resp = request.send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(UploadError::CatalogUnavailable {
                    status: status.as_u16(),
                });
            }
            let body = resp.bytes().await?;
            serde_json::from_slice(&body).map_err(UploadError::CatalogResponse)
        })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Interprets a chunk endpoint response.
///
/// Non-2xx bodies must carry `{"detail": ...}`; a body that does not parse
/// is reported as such rather than hidden behind a generic failure.
pub fn parse_chunk_response(
    stream: Stream,
    chunk: u32,
    status: u16,
    body: &[u8],
) -> Result<ChunkAck, UploadError> {
    if !is_success(status) {
        let err: ErrorBody =
            serde_json::from_slice(body).map_err(|source| UploadError::ChunkErrorBody {
                stream,
                chunk,
                status,
                source,
            })?;
        return Err(UploadError::ChunkRejected {
            stream,
            chunk,
            status,
            detail: err.detail_text(),
        });
    }
    serde_json::from_slice(body).map_err(|source| UploadError::ChunkAck {
        stream,
        chunk,
        source,
    })
}

/// Interprets a `process-video` response; success bodies are opaque.
pub fn parse_process_response(status: u16, body: &[u8]) -> Result<serde_json::Value, UploadError> {
    if !is_success(status) {
        let err: ErrorBody = serde_json::from_slice(body)
            .map_err(|source| UploadError::ProcessErrorBody { status, source })?;
        return Err(UploadError::ProcessRejected {
            status,
            detail: err.detail_text(),
        });
    }
    serde_json::from_slice(body).map_err(UploadError::ProcessResponse)
}
