//! YouTube URL normalization
//!
//! Shorts links (`/shorts/<id>`) are rewritten to the canonical watch URL,
//! which every backend accepts. Anything else passes through untouched.

use crate::error::{Result, YtStreamError};
use regex::Regex;
use std::sync::LazyLock;

const SHORTS_SEGMENT: &str = "/shorts/";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex"));

/// Rewrite a shorts URL into `https://www.youtube.com/watch?v=<id>`.
///
/// The id is the text after the first `/shorts/`, cut at the first `?`.
/// An empty id, or one with characters YouTube never uses in ids, is an
/// [`YtStreamError::InvalidUrl`].
pub fn normalize_youtube_url(url: &str) -> Result<String> {
    let Some((_, rest)) = url.split_once(SHORTS_SEGMENT) else {
        return Ok(url.to_string());
    };

    let video_id = rest.split('?').next().unwrap_or_default();
    if !VIDEO_ID.is_match(video_id) {
        return Err(YtStreamError::InvalidUrl(format!(
            "no video id in shorts URL: {}",
            url
        )));
    }

    Ok(format!("{WATCH_URL}{video_id}"))
}
