//! Bootstrap configuration
//!
//! The file config supplies the fallback bind address used whenever the
//! operator does not provide a valid one. It is loaded once, before the
//! resolver runs, and never re-read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_IP, DEFAULT_PORT};
use crate::error::ConfigError;

/// Address the HTTP listener binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    ip: Ipv4Addr,
    port: u16,
}

impl NetworkConfig {
    /// Build from raw operator input, `None` unless both parts are valid
    pub fn parse(ip: &str, port: &str) -> Option<Self> {
        Some(Self {
            ip: parse_ip(ip)?,
            port: parse_port(port)?,
        })
    }

    pub fn new(ip: Ipv4Addr, port: u16) -> Option<Self> {
        if port == 0 {
            return None;
        }
        Some(Self { ip, port })
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.ip, self.port))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ip: DEFAULT_IP,
            port: DEFAULT_PORT,
        }
    }
}

impl fmt::Display for NetworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Parse a dotted-quad IPv4 address.
///
/// Each octet must be 0-255 written without leading zeros; surrounding
/// whitespace is rejected rather than trimmed.
pub fn parse_ip(input: &str) -> Option<Ipv4Addr> {
    let octets: Vec<&str> = input.split('.').collect();
    if octets.len() != 4 {
        return None;
    }
    for octet in &octets {
        let well_formed = !octet.is_empty()
            && octet.len() <= 3
            && octet.bytes().all(|b| b.is_ascii_digit())
            && !(octet.len() > 1 && octet.starts_with('0'));
        if !well_formed {
            return None;
        }
    }
    input.parse().ok()
}

/// Parse a TCP port in `1..=65535`.
pub fn parse_port(input: &str) -> Option<u16> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match input.parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some(port),
    }
}

pub fn is_valid_ip(input: &str) -> bool {
    parse_ip(input).is_some()
}

pub fn is_valid_port(input: &str) -> bool {
    parse_port(input).is_some()
}

/// Values read from `app-config.toml`.
///
/// Both keys are optional and kept raw so that an out-of-range value is
/// reported by the resolver instead of aborting startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(rename = "IP", default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(rename = "PORT", default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
}

impl FileConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from an explicit path, which must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&content, path)?;
        tracing::info!("Config loaded from: {}", path.display());
        Ok(config)
    }

    /// Load from `explicit` if given, otherwise from the first existing
    /// default location. No file at all yields an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_locations().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load(&path),
            None => {
                tracing::debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Working directory first, then the per-user config directory
pub fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dirs) = directories::ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
        locations.push(dirs.config_dir().join(CONFIG_FILE_NAME));
    }
    locations
}
