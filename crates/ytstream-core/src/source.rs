//! Stream resolution backends

use crate::error::SourceError;
use crate::stream::{StreamDescriptor, StreamSet};
use async_trait::async_trait;

/// A video as resolved by a backend
#[derive(Debug, Clone)]
pub struct ResolvedVideo {
    /// Backend-reported video identifier, used for download filenames
    pub video_id: String,
    /// URL the video was resolved from; `read_stream` fetches the chosen
    /// stream from it again rather than from a pre-signed media URL
    pub url: String,
    pub title: Option<String>,
    pub streams: StreamSet,
}

/// Resolves video URLs into stream sets and reads selected streams.
///
/// The relay only talks to this trait, so the concrete backend can be
/// swapped out (yt-dlp in production, in-memory sources in tests).
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Fetch the video id and every stream available for `url`
    async fn resolve(&self, url: &str) -> Result<ResolvedVideo, SourceError>;

    /// Read the complete contents of `stream` into `buf`
    async fn read_stream(
        &self,
        video: &ResolvedVideo,
        stream: &StreamDescriptor,
        buf: &mut Vec<u8>,
    ) -> Result<(), SourceError>;
}
