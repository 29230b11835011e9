use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of one upload chunk (1 MiB).
pub const CHUNK_SIZE: u64 = 1024 * 1024;

/// Accepted MIME type for gameplay videos.
pub const VIDEO_MIME: &str = "video/mp4";

/// Accepted MIME type for background music.
pub const MUSIC_MIME: &str = "audio/mpeg";

/// Chunk endpoint for background music.
pub const UPLOAD_MUSIC_CHUNK_PATH: &str = "/upload-music-chunk/";

/// Chunk endpoint for gameplay video.
pub const UPLOAD_VIDEO_CHUNK_PATH: &str = "/upload-video-chunk/";

/// Finalize endpoint: starts server-side processing.
pub const PROCESS_VIDEO_PATH: &str = "/process-video/";

/// Catalog of submitted videos.
pub const VIDEOS_PATH: &str = "/videos";

/// Multipart field names shared by both chunk endpoints.
pub mod fields {
    pub const FILE: &str = "file";
    pub const CHUNK_NUMBER: &str = "chunk_number";
    pub const TOTAL_CHUNKS: &str = "total_chunks";
    pub const FILENAME: &str = "filename";
    pub const ACCOUNT_NAME: &str = "account_name";
    pub const GAME_MODE: &str = "game_mode";
    pub const WEAPON: &str = "weapon";
    pub const MAP_NAME: &str = "map_name";
    pub const BACKGROUND_MUSIC_FILENAME: &str = "background_music_filename";
}

/// Which upload stream a chunk belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stream {
    #[serde(rename = "music")]
    Music,
    #[serde(rename = "video")]
    Video,
}

impl Stream {
    /// Endpoint path that accepts this stream's chunks.
    pub fn chunk_path(self) -> &'static str {
        match self {
            Stream::Music => UPLOAD_MUSIC_CHUNK_PATH,
            Stream::Video => UPLOAD_VIDEO_CHUNK_PATH,
        }
    }

    /// MIME type a source file must have to enter this stream.
    pub fn mime(self) -> &'static str {
        match self {
            Stream::Music => MUSIC_MIME,
            Stream::Video => VIDEO_MIME,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Music => f.write_str("music"),
            Stream::Video => f.write_str("video"),
        }
    }
}

/// Download path for a processed video.
pub fn download_path(video_id: &str) -> String {
    format!("/video/{video_id}/download")
}
