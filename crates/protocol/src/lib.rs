//! Wire types for the killcam clip-processing API.
//!
//! Everything the client sends to or reads from the remote service lives
//! here: endpoint paths, multipart field names, JSON bodies and the video
//! catalog records.

pub mod constants;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use constants::Stream;
pub use messages::{ChunkAck, ErrorBody, ProcessVideoRequest, VideoList};
pub use types::{VideoMetadata, VideoRecord, VideoStatus};
