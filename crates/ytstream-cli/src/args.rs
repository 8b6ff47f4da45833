use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytstream")]
#[command(author, version, about = "HTTP relay for YouTube video and audio streams")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true, env = "YTSTREAM_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve(ServeOptions),

    /// List the streams available for a URL and the ones that would be relayed
    Formats {
        /// YouTube URL
        url: String,
    },

    /// Check that yt-dlp is installed
    Doctor,

    /// Show configuration
    Config,
}

#[derive(clap::Args, Clone, Default)]
pub struct ServeOptions {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from(["ytstream", "-v", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Some(Commands::Serve(opts)) => {
                assert_eq!(opts.port, Some(9000));
                assert!(opts.host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_no_command_defaults_to_none() {
        let cli = Cli::try_parse_from(["ytstream"]).unwrap();
        assert!(cli.command.is_none());
    }
}
