//! ytstream-core: URL normalization, stream selection and relaying for YouTube media

pub mod config;
pub mod error;
pub mod normalizer;
pub mod relay;
pub mod source;
pub mod stream;
pub mod ytdlp;

pub use config::Config;
pub use error::{Result, SourceError, YtStreamError};
pub use relay::{MediaPayload, RelayOptions, StreamRelay};
pub use source::{ResolvedVideo, StreamSource};
pub use stream::{MediaKind, Selection, StreamDescriptor, StreamSet};
pub use ytdlp::YtDlpSource;
