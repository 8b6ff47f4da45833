use anyhow::Result;
use std::path::Path;
use ytstream_core::config::{default_config_path, Config};

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytstream configuration\n");
    print!("{}", toml::to_string_pretty(&config)?);

    if config.paths.yt_dlp.is_none() {
        println!("\n# paths.yt_dlp unset: auto-detected from PATH");
    }

    // Show config file locations
    println!("\nConfig file locations (in priority order):");
    if let Some(p) = config_path {
        println!("  1. {} (specified)", p.display());
    }
    if let Some(path) = default_config_path() {
        println!("  2. {}", path.display());
    }
    println!("  3. Environment variables (YTSTREAM_*, nested keys joined with __)");

    Ok(())
}
