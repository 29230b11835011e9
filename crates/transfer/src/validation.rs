use std::path::{Path, PathBuf};

use killcam_protocol::Stream;
use killcam_protocol::constants::{MUSIC_MIME, VIDEO_MIME};

use crate::TransferError;

/// A local file that passed pre-upload checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    /// Final path component, sent as the multipart file name.
    pub file_name: String,
    pub size: u64,
    pub mime: String,
    pub stream: Stream,
}

/// Infers a MIME type from the file extension (case-insensitive).
pub fn detect_media_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("mp4") => Some(VIDEO_MIME),
        Some("mp3") => Some(MUSIC_MIME),
        _ => None,
    }
}

/// Checks that `path` is a readable regular file of the type `stream` accepts.
///
/// `declared_mime` wins over the extension when given. Nothing here touches
/// the network.
pub async fn validate_media(
    path: &Path,
    declared_mime: Option<&str>,
    stream: Stream,
) -> Result<MediaFile, TransferError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| TransferError::InvalidPath(path.display().to_string()))?
        .to_string();

    let mime = declared_mime
        .map(|m| m.trim().to_ascii_lowercase())
        .or_else(|| detect_media_type(path).map(str::to_string));
    let expected = stream.mime();
    let mime = match mime {
        Some(m) if m == expected => m,
        found => {
            return Err(TransferError::UnsupportedMedia {
                path: path.to_path_buf(),
                expected,
                found,
            });
        }
    };

    let meta = tokio::fs::metadata(path).await?;
    if !meta.is_file() {
        return Err(TransferError::NotAFile(path.to_path_buf()));
    }

    Ok(MediaFile {
        path: path.to_path_buf(),
        file_name,
        size: meta.len(),
        mime,
        stream,
    })
}
