//! Error types for ytstream-core

use crate::stream::MediaKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, YtStreamError>;

#[derive(Error, Debug)]
pub enum YtStreamError {
    #[error("{0} stream not found")]
    NotFound(MediaKind),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("yt-dlp not found. Install with: pip install yt-dlp")]
    YtDlpNotFound,

    #[error("yt-dlp failed with exit code {code:?}: {stderr}")]
    YtDlpFailed { code: Option<i32>, stderr: String },

    #[error("Video unavailable or private ({url}): {message}")]
    VideoUnavailable { url: String, message: String },

    #[error("Unsupported URL ({url}): {message}")]
    UnsupportedUrl { url: String, message: String },

    #[error("Failed to parse metadata: {0}")]
    MetadataParse(String),

    #[error("Stream {0} returned no data")]
    EmptyStream(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_text_is_passed_through() {
        let err: YtStreamError = SourceError::VideoUnavailable {
            url: "https://youtu.be/x".into(),
            message: "ERROR: [youtube] x: Private video".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Video unavailable or private (https://youtu.be/x): ERROR: [youtube] x: Private video"
        );
    }

    #[test]
    fn test_not_found_names_kind() {
        let err = YtStreamError::NotFound(MediaKind::Audio);
        assert_eq!(err.to_string(), "Audio stream not found");
    }
}
