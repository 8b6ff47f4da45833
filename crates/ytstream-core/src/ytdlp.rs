//! yt-dlp backed stream source

use crate::error::SourceError;
use crate::source::{ResolvedVideo, StreamSource};
use crate::stream::{StreamDescriptor, StreamSet};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct YtDlpSource {
    yt_dlp_path: PathBuf,
    extra_args: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VideoInfo {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    formats: Vec<FormatInfo>,
}

#[derive(Debug, Deserialize)]
struct FormatInfo {
    format_id: String,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    abr: Option<f64>,
}

impl From<FormatInfo> for StreamDescriptor {
    fn from(f: FormatInfo) -> Self {
        StreamDescriptor {
            format_id: f.format_id,
            container: f.ext.unwrap_or_default(),
            video_codec: codec(f.vcodec),
            audio_codec: codec(f.acodec),
            width: f.width,
            height: f.height,
            audio_bitrate: f.abr,
        }
    }
}

/// yt-dlp reports a missing track as the literal codec "none"
fn codec(value: Option<String>) -> Option<String> {
    value.filter(|c| !c.is_empty() && c != "none")
}

impl YtDlpSource {
    pub fn new(yt_dlp_path: PathBuf, extra_args: Vec<String>) -> Self {
        Self {
            yt_dlp_path,
            extra_args,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.yt_dlp_path);
        cmd.args(["--no-playlist", "--no-warnings"])
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// `yt-dlp --version`
    pub async fn version(&self) -> Result<String, SourceError> {
        let output = Command::new(&self.yt_dlp_path)
            .arg("--version")
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            return Err(classify_failure(
                output.status.code(),
                &String::from_utf8_lossy(&output.stderr),
                "--version",
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl StreamSource for YtDlpSource {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, url: &str) -> Result<ResolvedVideo, SourceError> {
        info!("Resolving streams for: {}", url);

        let output = self
            .command()
            .args(["--dump-single-json", "--", url])
            .output()
            .await
            .map_err(spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(classify_failure(output.status.code(), &stderr, url));
        }

        let video = parse_video_info(&output.stdout, url)?;
        debug!(
            "Resolved {} ({} streams)",
            video.video_id,
            video.streams.len()
        );
        Ok(video)
    }

    async fn read_stream(
        &self,
        video: &ResolvedVideo,
        stream: &StreamDescriptor,
        buf: &mut Vec<u8>,
    ) -> Result<(), SourceError> {
        info!(
            "Reading stream {} ({}) of {}",
            stream.format_id,
            stream.quality_label(),
            video.video_id
        );

        let mut child = self
            .command()
            .args(["--quiet", "--no-part", "-f", &stream.format_id, "-o", "-", "--"])
            .arg(&video.url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let mut stdout = child.stdout.take().ok_or_else(|| {
            SourceError::Io(std::io::Error::other("yt-dlp stdout not captured"))
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            SourceError::Io(std::io::Error::other("yt-dlp stderr not captured"))
        })?;

        let start = buf.len();
        let mut err_out = Vec::new();
        tokio::try_join!(stdout.read_to_end(buf), stderr.read_to_end(&mut err_out))?;
        let status = child.wait().await?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&err_out);
            debug!("yt-dlp stderr: {}", stderr);
            buf.truncate(start);
            return Err(classify_failure(status.code(), &stderr, &video.url));
        }

        if buf.len() == start {
            return Err(SourceError::EmptyStream(stream.format_id.clone()));
        }

        debug!("Read {} bytes for {}", buf.len() - start, video.video_id);
        Ok(())
    }
}

fn spawn_error(e: std::io::Error) -> SourceError {
    if e.kind() == std::io::ErrorKind::NotFound {
        SourceError::YtDlpNotFound
    } else {
        SourceError::Io(e)
    }
}

fn parse_video_info(stdout: &[u8], url: &str) -> Result<ResolvedVideo, SourceError> {
    let info: VideoInfo =
        serde_json::from_slice(stdout).map_err(|e| SourceError::MetadataParse(e.to_string()))?;

    let streams = info
        .formats
        .into_iter()
        .map(StreamDescriptor::from)
        .collect::<Vec<_>>();

    Ok(ResolvedVideo {
        video_id: info.id,
        url: url.to_string(),
        title: info.title,
        streams: StreamSet::new(streams),
    })
}

fn classify_failure(code: Option<i32>, stderr: &str, url: &str) -> SourceError {
    let message = last_line(stderr);

    if stderr.contains("Video unavailable") || stderr.contains("Private video") {
        return SourceError::VideoUnavailable {
            url: url.to_string(),
            message,
        };
    }
    if stderr.contains("is not a valid URL") || stderr.contains("Unsupported URL") {
        return SourceError::UnsupportedUrl {
            url: url.to_string(),
            message,
        };
    }

    SourceError::YtDlpFailed {
        code,
        stderr: message,
    }
}

/// Last non-empty stderr line; yt-dlp puts the ERROR there
fn last_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("no output")
        .trim()
        .to_string()
}
