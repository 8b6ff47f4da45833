//! ytstream-api: HTTP endpoints relaying YouTube media
//!
//! - `GET /health` reports liveness
//! - `GET /stream?url=...` returns the best progressive MP4
//! - `GET /audio?url=...` returns the best audio-only track

mod error;
mod handlers;
mod server;

pub use error::{ApiError, ServerError};
pub use handlers::{Health, MediaQuery, SERVICE_NAME};
pub use server::{bind, relay_from_config, router, run_server, AppState};
