//! Sequential chunked upload of one file.

use killcam_protocol::VideoMetadata;
use killcam_transfer::{ChunkReader, MediaFile, ProgressReport, RetryPolicy, TransferSession};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::UploadError;
use crate::transport::{ChunkForm, UploadTransport};

/// Server-confirmed outcome of one file upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    /// Name the server assigned to the reassembled file.
    pub filename: String,
    /// Full body of the final chunk's response.
    pub body: serde_json::Value,
}

/// Drives one file through reader, transport and retry policy.
///
/// Chunks go out strictly in order and each is awaited before the next is
/// read. A chunk that exhausts its retries aborts the file; chunks already
/// accepted by the server are left as they are.
pub struct FileUpload<'a> {
    transport: &'a dyn UploadTransport,
    retry: &'a RetryPolicy,
    chunk_size: u64,
}

impl<'a> FileUpload<'a> {
    pub fn new(transport: &'a dyn UploadTransport, retry: &'a RetryPolicy, chunk_size: u64) -> Self {
        Self {
            transport,
            retry,
            chunk_size,
        }
    }

    /// Uploads `media`, reporting byte progress on `progress_tx` after every
    /// accepted chunk.
    ///
    /// `metadata` is attached to every chunk; `music_filename` to chunk 1
    /// only. The sender is dropped on return, which ends the receiver's
    /// stream.
    pub async fn upload(
        &self,
        media: &MediaFile,
        metadata: Option<&VideoMetadata>,
        music_filename: Option<&str>,
        progress_tx: mpsc::Sender<ProgressReport>,
    ) -> Result<UploadResult, UploadError> {
        let stream = media.stream;
        let mut reader = ChunkReader::open(&media.path, self.chunk_size).await?;
        let mut session = TransferSession::new(media.file_name.as_str(), *reader.plan());
        session.start();

        info!(
            %stream,
            file = %session.file_name(),
            total_bytes = session.total_bytes(),
            total_chunks = session.total_chunks(),
            "starting upload"
        );

        let mut final_ack = None;
        while let Some(unit) = session.next_unit() {
            let data = match reader.read_unit(&unit).await {
                Ok(data) => data,
                Err(e) => {
                    session.fail();
                    return Err(e.into());
                }
            };

            let form = ChunkForm {
                file_name: media.file_name.clone(),
                mime: media.mime.clone(),
                chunk_number: unit.index,
                total_chunks: unit.total,
                data,
                metadata: metadata.cloned(),
                background_music_filename: if unit.is_first() {
                    music_filename.map(str::to_string)
                } else {
                    None
                },
            };

            let operation = format!("{stream} chunk {}/{}", unit.index, unit.total);
            let ack = match self
                .retry
                .run(&operation, || self.transport.send_chunk(stream, &form))
                .await
            {
                Ok(ack) => ack,
                Err(e) => {
                    session.fail();
                    warn!(
                        %stream,
                        chunk = unit.index,
                        bytes_confirmed = session.bytes_confirmed(),
                        error = %e,
                        "upload aborted"
                    );
                    return Err(e);
                }
            };

            let report = session.confirm(&unit)?;
            debug!(
                %stream,
                chunk = unit.index,
                total = unit.total,
                loaded = report.loaded,
                "chunk accepted"
            );
            let _ = progress_tx.send(report).await;

            if unit.is_last() {
                final_ack = Some(ack);
            }
        }

        let ack = final_ack.ok_or(UploadError::MissingFilename { stream })?;
        let filename = ack
            .filename()
            .map(str::to_string)
            .ok_or(UploadError::MissingFilename { stream })?;

        info!(%stream, filename = %filename, "upload complete");
        Ok(UploadResult {
            filename,
            body: ack.into_body(),
        })
    }
}
