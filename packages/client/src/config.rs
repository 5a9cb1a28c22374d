//! Client configuration.

use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::{
    endpoint::{DEFAULT_RELAY_PORT, EndpointError, parse_relay_url, relay_url},
    reconnect::{DEFAULT_MAX_ATTEMPTS, ReconnectPolicy},
};

/// Command line arguments for the sync client
#[derive(Debug, Parser)]
#[command(name = "pilgrim-sync-client", about = "Interactive client for the pilgrim sync relay")]
pub struct ClientArgs {
    /// Full relay URL, e.g. ws://127.0.0.1:3001/ws
    #[arg(long, env = "PILGRIM_SYNC_URL", conflicts_with = "origin")]
    pub url: Option<String>,

    /// Origin of the hosting page; the relay runs on the same host
    #[arg(long, default_value = "http://localhost")]
    pub origin: String,

    /// Relay port used with --origin
    #[arg(short, long, default_value_t = DEFAULT_RELAY_PORT)]
    pub port: u16,

    /// Reconnect attempts before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Base reconnect delay; the n-th attempt waits n times this
    #[arg(long, default_value_t = 1000)]
    pub base_timeout_ms: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub url: Url,
    pub policy: ReconnectPolicy,
}

impl TryFrom<&ClientArgs> for ClientConfig {
    type Error = EndpointError;

    fn try_from(args: &ClientArgs) -> Result<Self, Self::Error> {
        let url = match &args.url {
            Some(raw) => parse_relay_url(raw)?,
            None => relay_url(&args.origin, args.port)?,
        };
        Ok(Self {
            url,
            policy: ReconnectPolicy {
                base_timeout: Duration::from_millis(args.base_timeout_ms),
                max_attempts: args.max_attempts,
            },
        })
    }
}
