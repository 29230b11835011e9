//! Test doubles shared by the orchestration tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use killcam_protocol::{ChunkAck, ProcessVideoRequest, Stream, VideoList};
use killcam_transfer::{MediaFile, validate_media};

use crate::error::UploadError;
use crate::transport::{ChunkForm, TransportFuture, UploadTransport};

/// A chunk as received by [`MockTransport`].
#[derive(Debug, Clone)]
pub(crate) struct SentChunk {
    pub stream: Stream,
    pub form: ChunkForm,
}

struct ScriptedFailure {
    detail: String,
    /// `None` fails forever.
    remaining: Option<u32>,
}

/// Mock transport that records every request.
///
/// Final chunks are acknowledged with `srv_<file name>` unless
/// [`MockTransport::without_filenames`] is set.
pub(crate) struct MockTransport {
    chunks: Mutex<Vec<SentChunk>>,
    failures: Mutex<HashMap<(Stream, u32), ScriptedFailure>>,
    process_requests: Mutex<Vec<ProcessVideoRequest>>,
    process_failure: Option<String>,
    catalog: Option<VideoList>,
    filenames: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            process_requests: Mutex::new(Vec::new()),
            process_failure: None,
            catalog: None,
            filenames: true,
        }
    }

    /// Rejects `chunk` of `stream` with a 500 on every attempt.
    pub fn fail_chunk(self, stream: Stream, chunk: u32, detail: &str) -> Self {
        self.script_failure(stream, chunk, detail, None)
    }

    /// Rejects `chunk` of `stream` for the first `times` attempts.
    pub fn fail_chunk_times(self, stream: Stream, chunk: u32, detail: &str, times: u32) -> Self {
        self.script_failure(stream, chunk, detail, Some(times))
    }

    fn script_failure(self, stream: Stream, chunk: u32, detail: &str, remaining: Option<u32>) -> Self {
        self.failures.lock().unwrap().insert(
            (stream, chunk),
            ScriptedFailure {
                detail: detail.to_string(),
                remaining,
            },
        );
        self
    }

    /// Rejects every process-video request.
    pub fn fail_process(mut self, detail: &str) -> Self {
        self.process_failure = Some(detail.to_string());
        self
    }

    pub fn with_catalog(mut self, catalog: VideoList) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn without_filenames(mut self) -> Self {
        self.filenames = false;
        self
    }

    pub fn chunks(&self) -> Vec<SentChunk> {
        self.chunks.lock().unwrap().clone()
    }

    pub fn chunks_for(&self, stream: Stream) -> Vec<ChunkForm> {
        self.chunks()
            .into_iter()
            .filter(|c| c.stream == stream)
            .map(|c| c.form)
            .collect()
    }

    pub fn process_requests(&self) -> Vec<ProcessVideoRequest> {
        self.process_requests.lock().unwrap().clone()
    }

    fn respond_chunk(&self, stream: Stream, form: &ChunkForm) -> Result<ChunkAck, UploadError> {
        let chunk = form.chunk_number;
        if let Some(failure) = self.failures.lock().unwrap().get_mut(&(stream, chunk)) {
            let fail = match failure.remaining.as_mut() {
                None => true,
                Some(0) => false,
                Some(n) => {
                    *n -= 1;
                    true
                }
            };
            if fail {
                return Err(UploadError::ChunkRejected {
                    stream,
                    chunk,
                    status: 500,
                    detail: failure.detail.clone(),
                });
            }
        }

        let body = if chunk == form.total_chunks && self.filenames {
            serde_json::json!({
                "message": "upload complete",
                "filename": format!("srv_{}", form.file_name),
            })
        } else {
            serde_json::json!({ "message": format!("chunk {chunk} received") })
        };
        Ok(ChunkAck(body))
    }
}

impl UploadTransport for MockTransport {
    fn send_chunk(&self, stream: Stream, form: &ChunkForm) -> TransportFuture<'_, ChunkAck> {
        self.chunks.lock().unwrap().push(SentChunk {
            stream,
            form: form.clone(),
        });
        let result = self.respond_chunk(stream, form);
        Box::pin(async move { result })
    }

    fn process_video(
        &self,
        request: &ProcessVideoRequest,
    ) -> TransportFuture<'_, serde_json::Value> {
        self.process_requests.lock().unwrap().push(request.clone());
        let result = match &self.process_failure {
            Some(detail) => Err(UploadError::ProcessRejected {
                status: 500,
                detail: detail.clone(),
            }),
            None => Ok(serde_json::json!({
                "message": "processing started",
                "video_filename": request.video_filename,
            })),
        };
        Box::pin(async move { result })
    }

    fn list_videos(&self) -> TransportFuture<'_, VideoList> {
        let result = self
            .catalog
            .clone()
            .ok_or(UploadError::CatalogUnavailable { status: 503 });
        Box::pin(async move { result })
    }
}

/// Writes `len` patterned bytes to `dir/name` and validates it for `stream`.
pub(crate) async fn write_media(dir: &Path, name: &str, len: usize, stream: Stream) -> MediaFile {
    let path = dir.join(name);
    let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, data).unwrap();
    validate_media(&path, None, stream).await.unwrap()
}
