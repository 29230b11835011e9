//! Clip submission pipeline.
//!
//! This crate implements the **business logic** for submitting a gameplay
//! clip: it splits files into chunks, streams them to the service with
//! bounded retries, folds music and video progress into one percentage
//! and finally asks the service to start processing. Transport is behind
//! the [`UploadTransport`] trait; [`HttpTransport`] is the `reqwest`
//! implementation.
//!
//! # Pipeline
//!
//! 1. **Validate**: video present, metadata complete, MIME types accepted
//! 2. **Music**: optional, chunked upload of the background track
//! 3. **Video**: chunked upload carrying metadata and the music filename
//! 4. **Finalize**: `process-video` with both server filenames

pub mod catalog;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export primary types for convenience.
pub use catalog::{CatalogSummary, download_url, fetch_videos};
pub use coordinator::{
    PipelineState, SubmitEvent, SubmitOutcome, Submission, UploadCoordinator, UploadOptions,
};
pub use error::{Stage, SubmitError, UploadError};
pub use http::{DEFAULT_BASE_URL, HttpTransport};
pub use orchestrator::{FileUpload, UploadResult};
pub use transport::{ChunkForm, TransportFuture, UploadTransport};
