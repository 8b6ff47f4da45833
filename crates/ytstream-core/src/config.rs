//! Configuration management for ytstream

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub resolver: ResolverConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allow cross-origin requests from any origin
    pub cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Extra arguments passed to every yt-dlp invocation
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Extension used in the audio download filename.
    /// The payload is MP4 audio either way; "mp3" is kept for client compatibility.
    pub audio_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                cors: true,
            },
            paths: PathsConfig { yt_dlp: None },
            resolver: ResolverConfig {
                extra_args: Vec::new(),
            },
            relay: RelayConfig {
                audio_extension: "mp3".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(path) = default_config_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment, e.g. YTSTREAM_SERVER__PORT=9000
        figment = figment.merge(Env::prefixed("YTSTREAM_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ext = &self.relay.audio_extension;
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidValue(format!(
                "relay.audio_extension must be alphanumeric, got {:?}",
                ext
            )));
        }
        self.validate_host()?;
        Ok(())
    }

    /// IP literals (v4 or v6) or a DNS name such as "localhost"
    fn validate_host(&self) -> Result<(), ConfigError> {
        let host = &self.server.host;
        let is_name = !host.is_empty()
            && host
                .split('.')
                .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        if host.parse::<IpAddr>().is_ok() || is_name {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue(format!(
                "server.host must be an IP address or host name, got {:?}",
                host
            )))
        }
    }

    /// Host and port to bind; host names are resolved when binding
    pub fn bind_target(&self) -> (&str, u16) {
        (self.server.host.as_str(), self.server.port)
    }

    /// `host:port` for messages, with IPv6 literals bracketed
    pub fn listen_address(&self) -> String {
        if self.server.host.contains(':') {
            format!("[{}]:{}", self.server.host, self.server.port)
        } else {
            format!("{}:{}", self.server.host, self.server.port)
        }
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }
}

/// Location of the per-user config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ytstream/config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.relay.audio_extension, "mp3");
        assert!(config.paths.yt_dlp.is_none());
        assert_eq!(config.bind_target(), ("127.0.0.1", 8000));
        assert_eq!(config.listen_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9123\n\n[paths]\nyt_dlp = \"/opt/bin/yt-dlp\"\n\n[relay]\naudio_extension = \"m4a\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9123);
        assert_eq!(config.relay.audio_extension, "m4a");
        assert_eq!(config.yt_dlp_path().unwrap(), PathBuf::from("/opt/bin/yt-dlp"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_rejects_bad_audio_extension() {
        let mut config = Config::default();
        config.relay.audio_extension = "mp3\"; x=".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_accepts_host_names_and_ipv6() {
        for host in ["localhost", "::1", "0.0.0.0", "relay.internal.example"] {
            let mut config = Config::default();
            config.server.host = host.to_string();
            assert!(config.validate().is_ok(), "{host} should be accepted");
        }

        let mut config = Config::default();
        config.server.host = "::1".to_string();
        assert_eq!(config.listen_address(), "[::1]:8000");
    }

    #[test]
    fn test_rejects_bad_host() {
        for host in ["not a host", "", "bad..name"] {
            let mut config = Config::default();
            config.server.host = host.to_string();
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue(_))),
                "{host:?} should be rejected"
            );
        }
    }
}
