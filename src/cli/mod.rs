//! Command-line surface and bootstrap resolution

pub mod prompt;
pub mod resolver;

use clap::Parser;
use std::path::PathBuf;

pub use prompt::{wait_for_exit, Console, Prompt};
pub use resolver::{resolve, Resolution, Source};

/// Command-line flags.
///
/// `--ip` and `--port` are taken as raw strings and validated by the
/// resolver, so a bad value falls through to the next source instead of
/// aborting argument parsing.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "audio-device-api")]
#[command(about = "HTTP API for listing and selecting the system playback device")]
pub struct Args {
    /// IP address to bind the server to
    #[arg(short, long)]
    pub ip: Option<String>,

    /// Port number to run the server on
    #[arg(short, long)]
    pub port: Option<String>,

    /// Skip prompts and use default values
    #[arg(short, long)]
    pub default: bool,

    /// Path to the TOML config file supplying default IP and PORT
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from(["audio-device-api", "-i", "10.0.0.1", "-p", "9000", "-d"]).unwrap();
        assert_eq!(args.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(args.port.as_deref(), Some("9000"));
        assert!(args.default);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_invalid_port_is_not_a_parse_error() {
        let args = Args::try_parse_from(["audio-device-api", "--port", "99999"]).unwrap();
        assert_eq!(args.port.as_deref(), Some("99999"));
    }

    #[test]
    fn test_help_flag() {
        let err = Args::try_parse_from(["audio-device-api", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
