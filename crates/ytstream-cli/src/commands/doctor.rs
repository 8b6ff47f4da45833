use anyhow::Result;
use std::path::Path;
use ytstream_core::{config::Config, YtDlpSource};

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    println!("ytstream dependency check\n");

    let mut all_ok = true;

    // Check config
    print!("config:        ");
    let config = match Config::load(config_path) {
        Ok(config) => {
            println!("OK");
            config
        }
        Err(e) => {
            println!("INVALID ({})", e);
            all_ok = false;
            Config::default()
        }
    };

    // Check yt-dlp
    print!("yt-dlp:        ");
    match config.yt_dlp_path() {
        Ok(path) => {
            let source = YtDlpSource::new(path.clone(), Vec::new());
            match source.version().await {
                Ok(version) => println!("OK ({}, {})", version, path.display()),
                Err(e) => {
                    println!("FOUND but failed to get version: {}", e);
                    all_ok = false;
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("           Install with: pip install yt-dlp");
            all_ok = false;
        }
    }

    // ffmpeg is optional: only progressive and single-track formats are relayed
    print!("ffmpeg:        ");
    match which::which("ffmpeg") {
        Ok(path) => println!("OK ({})", path.display()),
        Err(_) => println!("not found (optional)"),
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}
