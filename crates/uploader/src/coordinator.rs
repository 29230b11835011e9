//! Submission coordinator: optional music upload, video upload, finalize.
//!
//! Publishes state transitions and one composite 0-100 progress value on
//! an event channel for whatever front end is driving the submission.

use std::path::Path;
use std::sync::Arc;

use killcam_protocol::{ProcessVideoRequest, Stream, VideoMetadata};
use killcam_transfer::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MUSIC_SHARE, MediaFile, ProgressWeights, RetryPolicy,
    TransferError, validate_media,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::error::{Stage, SubmitError, UploadError};
use crate::orchestrator::{FileUpload, UploadResult};
use crate::transport::UploadTransport;

/// Tunables for a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub chunk_size: u64,
    /// Percent of the composite bar given to music when music is present.
    pub music_share: u8,
    pub retry: RetryPolicy,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            music_share: DEFAULT_MUSIC_SHARE,
            retry: RetryPolicy::default(),
        }
    }
}

/// Coordinator lifecycle; transitions are strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Published once when the coordinator is created.
    Idle,
    UploadingMusic,
    UploadingVideo,
    Finalizing,
    Succeeded,
    Failed(Stage),
}

/// Events emitted while a submission runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitEvent {
    StateChanged(PipelineState),
    /// Composite progress after an accepted chunk of `stream`.
    Progress {
        stream: Stream,
        loaded: u64,
        total: u64,
        percent: f64,
    },
    Completed {
        video_filename: String,
        music_filename: Option<String>,
    },
    Failed {
        stage: Stage,
        error: String,
    },
}

/// Files and metadata for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub video: Option<MediaFile>,
    pub music: Option<MediaFile>,
    pub metadata: VideoMetadata,
}

impl Submission {
    /// Validates local files and metadata; performs no network I/O.
    pub async fn prepare(
        video: Option<&Path>,
        music: Option<&Path>,
        metadata: VideoMetadata,
    ) -> Result<Self, SubmitError> {
        let video = video.ok_or(SubmitError::MissingVideo)?;
        let video = validate_media(video, None, Stream::Video)
            .await
            .map_err(SubmitError::Media)?;
        let music = match music {
            Some(path) => Some(
                validate_media(path, None, Stream::Music)
                    .await
                    .map_err(SubmitError::Media)?,
            ),
            None => None,
        };
        let submission = Self {
            video: Some(video),
            music,
            metadata,
        };
        submission.check()?;
        Ok(submission)
    }

    /// Synchronous checks repeated at submit time.
    fn check(&self) -> Result<&MediaFile, SubmitError> {
        let video = self.video.as_ref().ok_or(SubmitError::MissingVideo)?;
        if let Some(field) = self.metadata.first_missing() {
            return Err(SubmitError::IncompleteMetadata(field));
        }
        check_stream(video, Stream::Video)?;
        if let Some(music) = &self.music {
            check_stream(music, Stream::Music)?;
        }
        Ok(video)
    }
}

fn check_stream(media: &MediaFile, stream: Stream) -> Result<(), SubmitError> {
    if media.stream == stream && media.mime == stream.mime() {
        return Ok(());
    }
    Err(SubmitError::Media(TransferError::UnsupportedMedia {
        path: media.path.clone(),
        expected: stream.mime(),
        found: Some(media.mime.clone()),
    }))
}

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub video: UploadResult,
    pub music_filename: Option<String>,
    /// Opaque body of the process-video response.
    pub processing: serde_json::Value,
}

/// Sequences music upload, video upload and the finalize call.
pub struct UploadCoordinator {
    transport: Arc<dyn UploadTransport>,
    options: UploadOptions,
    events_tx: mpsc::UnboundedSender<SubmitEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<SubmitEvent>>,
}

impl UploadCoordinator {
    pub fn new(transport: Arc<dyn UploadTransport>, options: UploadOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            transport,
            options,
            events_tx,
            events_rx: Some(events_rx),
        };
        coordinator.set_state(PipelineState::Idle);
        coordinator
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SubmitEvent>> {
        self.events_rx.take()
    }

    /// Runs one submission to completion.
    ///
    /// Failures are reported exactly once, tagged with the stage that
    /// produced them; no later stage runs after a failure.
    pub async fn submit(&self, submission: &Submission) -> Result<SubmitOutcome, SubmitError> {
        match self.run(submission).await {
            Ok(outcome) => {
                self.set_state(PipelineState::Succeeded);
                self.emit(SubmitEvent::Completed {
                    video_filename: outcome.video.filename.clone(),
                    music_filename: outcome.music_filename.clone(),
                });
                info!(video = %outcome.video.filename, "submission complete");
                Ok(outcome)
            }
            Err(e) => {
                let stage = e.stage();
                self.set_state(PipelineState::Failed(stage));
                self.emit(SubmitEvent::Failed {
                    stage,
                    error: e.to_string(),
                });
                error!(%stage, error = %e, "submission failed");
                Err(e)
            }
        }
    }

    async fn run(&self, submission: &Submission) -> Result<SubmitOutcome, SubmitError> {
        let video = submission.check()?;
        let weights = ProgressWeights::new(submission.music.is_some(), self.options.music_share);
        let uploader = FileUpload::new(
            self.transport.as_ref(),
            &self.options.retry,
            self.options.chunk_size,
        );

        let music_filename = match &submission.music {
            Some(music) => {
                self.set_state(PipelineState::UploadingMusic);
                let result = self
                    .upload_stream(&uploader, music, None, None, weights)
                    .await
                    .map_err(SubmitError::Music)?;
                Some(result.filename)
            }
            None => None,
        };

        self.set_state(PipelineState::UploadingVideo);
        let video_result = self
            .upload_stream(
                &uploader,
                video,
                Some(&submission.metadata),
                music_filename.as_deref(),
                weights,
            )
            .await
            .map_err(SubmitError::Video)?;

        self.set_state(PipelineState::Finalizing);
        let request = ProcessVideoRequest {
            video_filename: video_result.filename.clone(),
            music_filename: music_filename.clone(),
        };
        let processing = self
            .options
            .retry
            .run("process video", || self.transport.process_video(&request))
            .await
            .map_err(SubmitError::Finalize)?;

        Ok(SubmitOutcome {
            video: video_result,
            music_filename,
            processing,
        })
    }

    /// Uploads one file, rescaling its byte progress into composite events.
    async fn upload_stream(
        &self,
        uploader: &FileUpload<'_>,
        media: &MediaFile,
        metadata: Option<&VideoMetadata>,
        music_filename: Option<&str>,
        weights: ProgressWeights,
    ) -> Result<UploadResult, UploadError> {
        let (progress_tx, mut progress_rx) = mpsc::channel(16);
        let upload = uploader.upload(media, metadata, music_filename, progress_tx);
        let forward = async {
            while let Some(report) = progress_rx.recv().await {
                self.emit(SubmitEvent::Progress {
                    stream: media.stream,
                    loaded: report.loaded,
                    total: report.total,
                    percent: weights.composite(media.stream, report.percent()),
                });
            }
        };
        let (result, ()) = tokio::join!(upload, forward);
        result
    }

    fn set_state(&self, state: PipelineState) {
        self.emit(SubmitEvent::StateChanged(state));
    }

    fn emit(&self, event: SubmitEvent) {
        let _ = self.events_tx.send(event);
    }
}
