use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use ytstream_core::{
    config::Config, normalizer::normalize_youtube_url, MediaKind, StreamDescriptor, StreamSource,
    YtDlpSource,
};

pub async fn run(url: &str, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let url = normalize_youtube_url(url)?;
    let source = YtDlpSource::new(config.yt_dlp_path()?, config.resolver.extra_args.clone());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    pb.set_message(format!("Resolving {}", url));
    pb.enable_steady_tick(Duration::from_millis(100));

    let video = match source.resolve(&url).await {
        Ok(video) => {
            pb.finish_and_clear();
            video
        }
        Err(e) => {
            pb.abandon_with_message(format!("Failed: {}", e));
            return Err(e.into());
        }
    };

    let best_video = MediaKind::Video.selection().select(&video.streams);
    let best_audio = MediaKind::Audio.selection().select(&video.streams);

    println!(
        "{} {}\n",
        video.video_id,
        video.title.as_deref().unwrap_or_default()
    );
    println!(
        "  {:<10} {:<6} {:<12} {:<10} {:<14} {:<14}",
        "FORMAT", "EXT", "CLASS", "QUALITY", "VCODEC", "ACODEC"
    );
    for stream in video.streams.iter() {
        let marker = if Some(stream) == best_video.as_ref() {
            "  <- /stream"
        } else if Some(stream) == best_audio.as_ref() {
            "  <- /audio"
        } else {
            ""
        };
        println!(
            "  {:<10} {:<6} {:<12} {:<10} {:<14} {:<14}{}",
            stream.format_id,
            stream.container,
            class_label(stream),
            stream.quality_label(),
            stream.video_codec.as_deref().unwrap_or("-"),
            stream.audio_codec.as_deref().unwrap_or("-"),
            marker
        );
    }

    if best_video.is_none() {
        println!("\nNo progressive MP4 stream: /stream would return 404");
    }
    if best_audio.is_none() {
        println!("\nNo audio-only stream: /audio would return 404");
    }

    Ok(())
}

fn class_label(stream: &StreamDescriptor) -> &'static str {
    use ytstream_core::stream::StreamClass;

    match stream.class() {
        Some(StreamClass::Progressive) => "progressive",
        Some(StreamClass::VideoOnly) => "video only",
        Some(StreamClass::AudioOnly) => "audio only",
        None => "other",
    }
}
