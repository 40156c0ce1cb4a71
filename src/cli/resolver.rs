//! Bind address resolution
//!
//! Precedence, highest first:
//!
//! 1. `--ip` together with `--port`, when both are valid
//! 2. `--default`: file config, else built-in defaults, no prompt
//! 3. interactive prompt, each field falling back on its own
//!
//! Every value is validated before it is accepted, including the ones read
//! from the config file.

use std::net::Ipv4Addr;

use super::prompt::Prompt;
use super::Args;
use crate::config::{parse_ip, parse_port, FileConfig, NetworkConfig};
use crate::constants::{DEFAULT_IP, DEFAULT_PORT};
use crate::error::ConfigError;

/// Where the resolved address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Both command-line flags
    Cli,
    /// `--default` flag
    Defaults,
    /// Operator declined manual configuration
    Declined,
    /// Operator entered values at the prompt
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub config: NetworkConfig,
    pub source: Source,
}

/// File config values after validation, with built-in defaults filled in
#[derive(Debug, Clone, Copy)]
struct Fallback {
    ip: Ipv4Addr,
    port: u16,
}

impl Fallback {
    fn from_file<P: Prompt>(file: &FileConfig, prompt: &mut P) -> Result<Self, ConfigError> {
        let ip = match file.ip.as_deref() {
            None => DEFAULT_IP,
            Some(raw) => match parse_ip(raw) {
                Some(ip) => ip,
                None => {
                    warn(prompt, &format!("Invalid IP {raw:?} in config file. Using {DEFAULT_IP}"))?;
                    DEFAULT_IP
                }
            },
        };

        let port = match file.port {
            None => DEFAULT_PORT,
            Some(raw) => match u16::try_from(raw).ok().filter(|p| *p != 0) {
                Some(port) => port,
                None => {
                    warn(prompt, &format!("Invalid PORT {raw} in config file. Using {DEFAULT_PORT}"))?;
                    DEFAULT_PORT
                }
            },
        };

        Ok(Self { ip, port })
    }

    fn config(self) -> NetworkConfig {
        NetworkConfig::new(self.ip, self.port).unwrap_or_default()
    }
}

fn warn<P: Prompt>(prompt: &mut P, message: &str) -> Result<(), ConfigError> {
    prompt.warn(message).map_err(ConfigError::Prompt)
}

fn ask<P: Prompt>(prompt: &mut P, question: &str) -> Result<String, ConfigError> {
    prompt.ask(question).map_err(ConfigError::Prompt)
}

/// Resolve the bind address. Runs once, before the listener binds.
pub fn resolve<P: Prompt>(
    args: &Args,
    file: &FileConfig,
    prompt: &mut P,
) -> Result<Resolution, ConfigError> {
    match (args.ip.as_deref(), args.port.as_deref()) {
        (Some(ip), Some(port)) => {
            if let Some(config) = NetworkConfig::parse(ip, port) {
                return Ok(Resolution {
                    config,
                    source: Source::Cli,
                });
            }
            warn(prompt, &format!("Ignoring invalid --ip {ip:?} / --port {port:?}"))?;
        }
        (Some(_), None) | (None, Some(_)) => {
            warn(prompt, "--ip and --port must be given together. Ignoring")?;
        }
        (None, None) => {}
    }

    let fallback = Fallback::from_file(file, prompt)?;

    if args.default {
        return Ok(Resolution {
            config: fallback.config(),
            source: Source::Defaults,
        });
    }

    let answer = ask(prompt, "[✅] Do you want to manually configure IP and Port? (y/N): ")?;
    if !answer.eq_ignore_ascii_case("y") {
        return Ok(Resolution {
            config: fallback.config(),
            source: Source::Declined,
        });
    }

    let ip_input = ask(prompt, &format!("[✅] Enter IP (default: {}): ", fallback.ip))?;
    let port_input = ask(prompt, &format!("[✅] Enter Port (default: {}): ", fallback.port))?;

    let ip = match parse_ip(&ip_input) {
        Some(ip) => ip,
        None => {
            if !ip_input.is_empty() {
                warn(prompt, &format!("Invalid IP entered. Falling back to default: {}", fallback.ip))?;
            }
            fallback.ip
        }
    };

    let port = match parse_port(&port_input) {
        Some(port) => port,
        None => {
            if !port_input.is_empty() {
                warn(prompt, &format!("Invalid Port entered. Falling back to default: {}", fallback.port))?;
            }
            fallback.port
        }
    };

    Ok(Resolution {
        config: Fallback { ip, port }.config(),
        source: Source::Prompt,
    })
}
