//! Stream descriptors and the selection policies run over them

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a relay request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            MediaKind::Video => "video/mp4",
            MediaKind::Audio => "audio/mp4",
        }
    }

    pub fn selection(&self) -> Selection {
        match self {
            MediaKind::Video => Selection::HighestResolutionProgressive,
            MediaKind::Audio => Selection::BestAudio,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "Video"),
            MediaKind::Audio => write!(f, "Audio"),
        }
    }
}

/// Which tracks a stream carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamClass {
    /// Audio and video muxed together
    Progressive,
    VideoOnly,
    AudioOnly,
}

/// One selectable media track as reported by a backend
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamDescriptor {
    /// Backend-specific handle used to read this stream
    pub format_id: String,
    /// Container extension, e.g. "mp4", "webm", "m4a"
    pub container: String,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Audio bitrate in kbit/s
    pub audio_bitrate: Option<f64>,
}

impl StreamDescriptor {
    pub fn class(&self) -> Option<StreamClass> {
        match (self.video_codec.is_some(), self.audio_codec.is_some()) {
            (true, true) => Some(StreamClass::Progressive),
            (true, false) => Some(StreamClass::VideoOnly),
            (false, true) => Some(StreamClass::AudioOnly),
            (false, false) => None,
        }
    }

    pub fn is_progressive(&self) -> bool {
        self.class() == Some(StreamClass::Progressive)
    }

    pub fn is_audio_only(&self) -> bool {
        self.class() == Some(StreamClass::AudioOnly)
    }

    /// Short label like "720p" or "128kbps"
    pub fn quality_label(&self) -> String {
        match (self.height, self.audio_bitrate) {
            (Some(h), _) => format!("{}p", h),
            (None, Some(abr)) => format!("{:.0}kbps", abr),
            (None, None) => "-".to_string(),
        }
    }
}

/// A filterable, orderable set of streams
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamSet {
    streams: Vec<StreamDescriptor>,
}

impl StreamSet {
    pub fn new(streams: Vec<StreamDescriptor>) -> Self {
        Self { streams }
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams.iter()
    }

    pub fn first(&self) -> Option<&StreamDescriptor> {
        self.streams.first()
    }

    pub fn filter<F>(&self, pred: F) -> StreamSet
    where
        F: Fn(&StreamDescriptor) -> bool,
    {
        StreamSet::new(self.streams.iter().filter(|s| pred(*s)).cloned().collect())
    }

    pub fn audio_only(&self) -> StreamSet {
        self.filter(StreamDescriptor::is_audio_only)
    }

    pub fn progressive(&self) -> StreamSet {
        self.filter(StreamDescriptor::is_progressive)
    }

    pub fn with_container(&self, container: &str) -> StreamSet {
        self.filter(|s| s.container.eq_ignore_ascii_case(container))
    }

    /// Order by audio bitrate, highest first. Streams without a bitrate sort last.
    pub fn order_by_bitrate_desc(mut self) -> StreamSet {
        self.streams.sort_by(|a, b| {
            let a = a.audio_bitrate.unwrap_or(f64::NEG_INFINITY);
            let b = b.audio_bitrate.unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });
        self
    }

    /// The tallest stream; the first one wins on ties
    pub fn highest_resolution(&self) -> Option<&StreamDescriptor> {
        self.streams
            .iter()
            .filter(|s| s.height.is_some())
            .fold(None, |best: Option<&StreamDescriptor>, s| match best {
                Some(b) if b.height >= s.height => Some(b),
                _ => Some(s),
            })
    }
}

impl From<Vec<StreamDescriptor>> for StreamSet {
    fn from(streams: Vec<StreamDescriptor>) -> Self {
        Self::new(streams)
    }
}

/// Stream selection policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Highest resolution MP4 stream carrying both audio and video
    HighestResolutionProgressive,
    /// Audio-only stream with the highest bitrate
    BestAudio,
}

impl Selection {
    pub fn select(&self, streams: &StreamSet) -> Option<StreamDescriptor> {
        match self {
            Selection::HighestResolutionProgressive => streams
                .progressive()
                .with_container("mp4")
                .highest_resolution()
                .cloned(),
            Selection::BestAudio => streams
                .audio_only()
                .order_by_bitrate_desc()
                .first()
                .cloned(),
        }
    }
}
