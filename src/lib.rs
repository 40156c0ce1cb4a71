//! # Audio Device API
//!
//! Small HTTP API for listing and selecting the system playback device.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                             BOOTSTRAP                                │
//! │                                                                      │
//! │   CLI flags ──┐                                                      │
//! │   --default ──┼──▶ Resolver (cli::resolver) ──▶ NetworkConfig        │
//! │   prompt    ──┤          ▲                          │                │
//! │               │   app-config.toml / 127.0.0.1:8009  │                │
//! │                                                     ▼                │
//! │                 Route Registry (api::registry) ──▶ listener bind     │
//! └──────────────────────────────────────────────────────┼───────────────┘
//!                                                        │
//! ┌──────────────────────────────────────────────────────┼───────────────┐
//! │                          REQUEST PIPELINE            ▼               │
//! │                                                                      │
//! │   CORS ─▶ access log ─▶ panic catcher ─▶ router                      │
//! │                                            │                         │
//! │                                            ▼                         │
//! │                 Validated<T> extractor (api::validation)             │
//! │                   rules ─▶ deserialize ─▶ sanitize                   │
//! │                                            │                         │
//! │                                            ▼                         │
//! │                 handler ─▶ AudioBackend (audio::system)              │
//! │                    │                                                 │
//! │          Ok ───────┴──────── Err(Error)                              │
//! │          │                       │                                   │
//! │          ▼                       ▼                                   │
//! │   {status:true,...}    Central translator (api::translator)          │
//! │                        {status:false, message[, errors]}             │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;

pub use error::{AppError, Error, Result};

/// Application-wide constants
pub mod constants {
    use std::net::Ipv4Addr;

    /// Bind address used when neither the operator nor the config file
    /// supplies a valid one
    pub const DEFAULT_IP: Ipv4Addr = Ipv4Addr::LOCALHOST;

    /// Bind port used when neither the operator nor the config file
    /// supplies a valid one
    pub const DEFAULT_PORT: u16 = 8009;

    /// File config name, looked up in the working directory first
    pub const CONFIG_FILE_NAME: &str = "app-config.toml";

    /// Largest request body accepted by the JSON extractors
    pub const MAX_BODY_BYTES: usize = 64 * 1024;
}
