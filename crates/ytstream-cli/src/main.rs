mod args;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match cli.verbose {
        0 => "ytstream=info,ytstream_core=info,ytstream_api=info,tower_http=info",
        1 => "ytstream=debug,ytstream_core=debug,ytstream_api=debug,tower_http=debug",
        2 => "ytstream=trace,ytstream_core=trace,ytstream_api=trace,tower_http=trace",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Some(Commands::Serve(options)) => commands::serve::run(&options, config_path).await,
        Some(Commands::Formats { url }) => commands::formats::run(&url, config_path).await,
        Some(Commands::Doctor) => commands::doctor::run(config_path).await,
        Some(Commands::Config) => commands::config::run(config_path).await,
        None => commands::serve::run(&args::ServeOptions::default(), config_path).await,
    }
}
