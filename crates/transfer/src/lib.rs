//! Chunked file transfer primitives: chunk planning, progress accounting,
//! retry scheduling and media validation.

mod chunked;
mod progress;
mod retry;
mod session;
mod validation;

use std::path::PathBuf;

pub use chunked::{ChunkPlan, ChunkReader, TransferUnit};
pub use progress::{DEFAULT_MUSIC_SHARE, ProgressReport, ProgressWeights};
pub use retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAYS, RetryAttempt, RetryPolicy};
pub use session::{SessionStatus, TransferSession};
pub use validation::{MediaFile, detect_media_type, validate_media};

/// Default chunk size: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = killcam_protocol::constants::CHUNK_SIZE;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("file of {total_bytes} bytes needs more than {max} chunks", max = u32::MAX)]
    TooManyChunks { total_bytes: u64 },

    #[error("chunk {index} out of range (1..={total})")]
    UnitOutOfRange { index: u32, total: u32 },

    #[error("chunk {got} confirmed out of order, expected {expected}")]
    OutOfOrder { expected: u32, got: u32 },

    #[error(
        "{}: expected {expected}, got {}",
        .path.display(),
        .found.as_deref().unwrap_or("unknown type")
    )]
    UnsupportedMedia {
        path: PathBuf,
        expected: &'static str,
        found: Option<String>,
    },

    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}
