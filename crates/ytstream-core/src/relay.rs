//! Stream relay: normalize, resolve, select, buffer

use crate::error::{Result, YtStreamError};
use crate::normalizer::normalize_youtube_url;
use crate::source::StreamSource;
use crate::stream::MediaKind;
use crate::Config;

use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// A fully buffered stream ready to hand to the HTTP layer
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: &'static str,
}

impl MediaPayload {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Relay settings derived from [`Config`]
#[derive(Debug, Clone)]
pub struct RelayOptions {
    pub video_extension: String,
    pub audio_extension: String,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            video_extension: "mp4".to_string(),
            audio_extension: "mp3".to_string(),
        }
    }
}

impl From<&Config> for RelayOptions {
    fn from(config: &Config) -> Self {
        Self {
            audio_extension: config.relay.audio_extension.clone(),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct StreamRelay {
    source: Arc<dyn StreamSource>,
    config: RelayOptions,
}

impl StreamRelay {
    pub fn new(source: Arc<dyn StreamSource>, config: RelayOptions) -> Self {
        Self { source, config }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Highest resolution progressive stream of `url`
    pub async fn get_video(&self, url: &str) -> Result<MediaPayload> {
        self.fetch(url, MediaKind::Video).await
    }

    /// Highest bitrate audio-only stream of `url`
    pub async fn get_audio(&self, url: &str) -> Result<MediaPayload> {
        self.fetch(url, MediaKind::Audio).await
    }

    pub async fn fetch(&self, url: &str, kind: MediaKind) -> Result<MediaPayload> {
        let request_id = Uuid::new_v4();
        let span = info_span!("relay", %request_id, kind = %kind);
        self.fetch_inner(url, kind).instrument(span).await
    }

    async fn fetch_inner(&self, url: &str, kind: MediaKind) -> Result<MediaPayload> {
        let start_time = Instant::now();

        // 1. Normalize
        let url = normalize_youtube_url(url)?;
        info!("Relaying {} for: {}", kind, url);

        // 2. Resolve
        let video = self.source.resolve(&url).await?;

        // 3. Select
        let stream = kind
            .selection()
            .select(&video.streams)
            .ok_or(YtStreamError::NotFound(kind))?;
        debug!(
            "Selected format {} ({}, {}) out of {}",
            stream.format_id,
            stream.container,
            stream.quality_label(),
            video.streams.len()
        );

        // 4. Buffer
        let mut buf = Vec::new();
        self.source.read_stream(&video, &stream, &mut buf).await?;

        // 5. Name
        let extension = match kind {
            MediaKind::Video => &self.config.video_extension,
            MediaKind::Audio => &self.config.audio_extension,
        };
        let filename = format!("{}.{}", video.video_id, extension);

        info!(
            "Relayed {} ({} bytes, {:.1}s)",
            filename,
            buf.len(),
            start_time.elapsed().as_secs_f32()
        );

        Ok(MediaPayload {
            bytes: Bytes::from(buf),
            filename,
            content_type: kind.content_type(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::source::ResolvedVideo;
    use crate::stream::tests::{audio, progressive, video_only};
    use crate::stream::{StreamDescriptor, StreamSet};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves a fixed stream set; each stream's bytes are its format id
    struct FakeSource {
        streams: Vec<StreamDescriptor>,
        fail_with: Option<String>,
        resolved: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(streams: Vec<StreamDescriptor>) -> Self {
            Self {
                streams,
                fail_with: None,
                resolved: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::new(Vec::new())
            }
        }
    }

    #[async_trait]
    impl StreamSource for FakeSource {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn resolve(&self, url: &str) -> std::result::Result<ResolvedVideo, SourceError> {
            self.resolved.lock().unwrap().push(url.to_string());
            if let Some(ref message) = self.fail_with {
                return Err(SourceError::YtDlpFailed {
                    code: Some(1),
                    stderr: message.clone(),
                });
            }
            Ok(ResolvedVideo {
                video_id: "abc123".to_string(),
                url: url.to_string(),
                title: None,
                streams: StreamSet::new(self.streams.clone()),
            })
        }

        async fn read_stream(
            &self,
            _video: &ResolvedVideo,
            stream: &StreamDescriptor,
            buf: &mut Vec<u8>,
        ) -> std::result::Result<(), SourceError> {
            buf.extend_from_slice(stream.format_id.as_bytes());
            Ok(())
        }
    }

    fn relay(source: FakeSource) -> (StreamRelay, Arc<FakeSource>) {
        let source = Arc::new(source);
        (
            StreamRelay::new(source.clone(), RelayOptions::default()),
            source,
        )
    }

    fn full_set() -> Vec<StreamDescriptor> {
        vec![
            progressive("18", "mp4", 360),
            progressive("22", "mp4", 720),
            video_only("137", 1080),
            audio("140", "m4a", Some(129.5)),
            audio("251", "webm", Some(160.0)),
        ]
    }

    #[tokio::test]
    async fn test_get_video() {
        let (relay, _) = relay(FakeSource::new(full_set()));
        let payload = relay.get_video("https://www.youtube.com/watch?v=abc123").await.unwrap();

        assert_eq!(&payload.bytes[..], b"22");
        assert_eq!(payload.filename, "abc123.mp4");
        assert_eq!(payload.content_type, "video/mp4");
        assert_eq!(
            payload.content_disposition(),
            "attachment; filename=\"abc123.mp4\""
        );
    }

    #[tokio::test]
    async fn test_get_audio() {
        let (relay, _) = relay(FakeSource::new(full_set()));
        let payload = relay.get_audio("https://www.youtube.com/watch?v=abc123").await.unwrap();

        assert_eq!(&payload.bytes[..], b"251");
        assert_eq!(payload.filename, "abc123.mp3");
        assert_eq!(payload.content_type, "audio/mp4");
    }

    #[tokio::test]
    async fn test_audio_extension_is_configurable() {
        let source = Arc::new(FakeSource::new(full_set()));
        let relay = StreamRelay::new(
            source,
            RelayOptions {
                audio_extension: "m4a".to_string(),
                ..RelayOptions::default()
            },
        );
        let payload = relay.get_audio("https://youtu.be/abc123").await.unwrap();
        assert_eq!(payload.filename, "abc123.m4a");
    }

    #[tokio::test]
    async fn test_shorts_url_is_normalized_before_resolving() {
        let (relay, source) = relay(FakeSource::new(full_set()));
        relay
            .get_video("https://youtube.com/shorts/abc123?feature=share")
            .await
            .unwrap();

        assert_eq!(
            source.resolved.lock().unwrap().as_slice(),
            ["https://www.youtube.com/watch?v=abc123"]
        );
    }

    #[tokio::test]
    async fn test_invalid_shorts_url_never_reaches_source() {
        let (relay, source) = relay(FakeSource::new(full_set()));
        let err = relay.get_audio("https://youtube.com/shorts/").await.unwrap_err();

        assert!(matches!(err, YtStreamError::InvalidUrl(_)));
        assert!(source.resolved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_progressive_stream() {
        let (relay, _) = relay(FakeSource::new(vec![
            video_only("137", 1080),
            audio("251", "webm", Some(160.0)),
        ]));
        let err = relay.get_video("https://youtu.be/abc123").await.unwrap_err();
        assert!(matches!(err, YtStreamError::NotFound(MediaKind::Video)));
    }

    #[tokio::test]
    async fn test_no_audio_stream() {
        let (relay, _) = relay(FakeSource::new(vec![progressive("18", "mp4", 360)]));
        let err = relay.get_audio("https://youtu.be/abc123").await.unwrap_err();
        assert!(matches!(err, YtStreamError::NotFound(MediaKind::Audio)));
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let (relay, _) = relay(FakeSource::failing("ERROR: HTTP Error 429"));
        let err = relay.get_video("https://youtu.be/abc123").await.unwrap_err();

        assert!(matches!(err, YtStreamError::Source(_)));
        assert!(err.to_string().contains("ERROR: HTTP Error 429"));
    }
}
