use anyhow::Result;
use std::path::Path;
use ytstream_core::config::Config;

use crate::args::ServeOptions;

pub async fn run(options: &ServeOptions, config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load(config_path)?;

    if let Some(ref host) = options.host {
        config.server.host = host.clone();
    }
    if let Some(port) = options.port {
        config.server.port = port;
    }

    ytstream_api::run_server(config).await?;
    Ok(())
}
