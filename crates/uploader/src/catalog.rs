//! Video catalog queries.

use killcam_protocol::constants::download_path;
use killcam_protocol::{VideoRecord, VideoStatus};

use crate::error::UploadError;
use crate::transport::UploadTransport;

/// Counts of catalog entries by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    pub completed: usize,
    pub failed: usize,
    pub processing: usize,
    pub other: usize,
}

impl CatalogSummary {
    pub fn of(videos: &[VideoRecord]) -> Self {
        let mut summary = Self::default();
        for video in videos {
            match video.status {
                VideoStatus::Completed => summary.completed += 1,
                VideoStatus::Failed => summary.failed += 1,
                VideoStatus::Processing => summary.processing += 1,
                VideoStatus::Other(_) => summary.other += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.completed + self.failed + self.processing + self.other
    }

    /// `true` when nothing is still being processed.
    pub fn is_settled(&self) -> bool {
        self.processing == 0 && self.other == 0
    }
}

/// Fetches the catalog, most recently updated first.
pub async fn fetch_videos(transport: &dyn UploadTransport) -> Result<Vec<VideoRecord>, UploadError> {
    let mut videos = transport.list_videos().await?.videos;
    // ISO-8601 timestamps sort lexically.
    videos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(videos)
}

/// Download link for a video, or `None` until processing has completed.
pub fn download_url(base_url: &str, video: &VideoRecord) -> Option<String> {
    (video.status == VideoStatus::Completed)
        .then(|| format!("{}{}", base_url.trim_end_matches('/'), download_path(&video.id)))
}
