//! Transport trait between the upload logic and the remote service.
//!
//! `HttpTransport` is the production implementation; tests drive the
//! orchestration against an in-memory double.

use std::future::Future;
use std::pin::Pin;

use killcam_protocol::constants::fields;
use killcam_protocol::{ChunkAck, ProcessVideoRequest, Stream, VideoList, VideoMetadata};

use crate::error::UploadError;

/// Boxed future returned by transport calls.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UploadError>> + Send + 'a>>;

/// One chunk upload request, ready to encode as multipart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkForm {
    /// Original file name, used both for the file part and the `filename` field.
    pub file_name: String,
    pub mime: String,
    pub chunk_number: u32,
    pub total_chunks: u32,
    pub data: Vec<u8>,
    /// Present on video chunks only.
    pub metadata: Option<VideoMetadata>,
    /// Present on video chunk 1 only, and only when music was uploaded.
    pub background_music_filename: Option<String>,
}

impl ChunkForm {
    /// Text fields in the order they are written to the form.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![
            (fields::CHUNK_NUMBER, self.chunk_number.to_string()),
            (fields::TOTAL_CHUNKS, self.total_chunks.to_string()),
            (fields::FILENAME, self.file_name.clone()),
        ];
        if let Some(meta) = &self.metadata {
            out.push((fields::ACCOUNT_NAME, meta.account_name.clone()));
            out.push((fields::GAME_MODE, meta.game_mode.clone()));
            out.push((fields::WEAPON, meta.weapon.clone()));
            out.push((fields::MAP_NAME, meta.map_name.clone()));
        }
        if let Some(music) = &self.background_music_filename {
            out.push((fields::BACKGROUND_MUSIC_FILENAME, music.clone()));
        }
        out
    }
}

/// Abstract connection to the clip-processing service.
///
/// Implementations perform exactly one request per call; retrying is the
/// caller's job.
pub trait UploadTransport: Send + Sync {
    /// Sends one chunk to the endpoint for `stream`.
    fn send_chunk(&self, stream: Stream, form: &ChunkForm) -> TransportFuture<'_, ChunkAck>;

    /// Asks the service to start processing uploaded files.
    fn process_video(
        &self,
        request: &ProcessVideoRequest,
    ) -> TransportFuture<'_, serde_json::Value>;

    /// Fetches the video catalog.
    fn list_videos(&self) -> TransportFuture<'_, VideoList>;
}
