//! Router construction and server bootstrap

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use ytstream_core::{Config, RelayOptions, StreamRelay, YtDlpSource};

use crate::error::ServerError;
use crate::handlers::{download_audio, health, stream_video};

#[derive(Clone)]
pub struct AppState {
    pub relay: StreamRelay,
}

/// Build the application router around a relay
pub fn router(relay: StreamRelay, cors: bool) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .route("/stream", get(stream_video))
        .route("/audio", get(download_audio))
        .layer(TraceLayer::new_for_http());

    let app = if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    app.with_state(AppState { relay })
}

/// Relay backed by the yt-dlp binary named in `config`
pub fn relay_from_config(config: &Config) -> Result<StreamRelay, ServerError> {
    let yt_dlp = config.yt_dlp_path()?;
    let location = yt_dlp.display().to_string();

    let source = YtDlpSource::new(yt_dlp, config.resolver.extra_args.clone());
    let relay = StreamRelay::new(Arc::new(source), RelayOptions::from(config));
    info!("Resolving streams with {} at {}", relay.source_name(), location);
    Ok(relay)
}

/// Bind the configured host and port, resolving host names like "localhost"
pub async fn bind(config: &Config) -> Result<TcpListener, ServerError> {
    TcpListener::bind(config.bind_target())
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.listen_address(),
            source,
        })
}

/// Serve until Ctrl-C
pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let relay = relay_from_config(&config)?;
    let app = router(relay, config.server.cors);

    let listener = bind(&config).await?;
    let addr = listener.local_addr()?;

    info!("YouTube Stream API listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
