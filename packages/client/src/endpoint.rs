//! Relay endpoint resolution.

use thiserror::Error;
use url::Url;

pub const DEFAULT_RELAY_PORT: u16 = 3001;
pub const RELAY_PATH: &str = "/ws";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("Origin '{0}' has no host")]
    MissingHost(String),

    #[error("Relay URL must use ws or wss, got '{0}'")]
    UnsupportedScheme(String),
}

/// Build the relay URL for a page served from `origin`.
///
/// Same host as the origin, the given port and path `/ws`; `wss` when the
/// origin is served over `https`, `ws` otherwise.
pub fn relay_url(origin: &str, port: u16) -> Result<Url, EndpointError> {
    let origin_url =
        Url::parse(origin).map_err(|e| EndpointError::InvalidUrl(origin.to_string(), e.to_string()))?;
    let host = origin_url
        .host_str()
        .ok_or_else(|| EndpointError::MissingHost(origin.to_string()))?;
    let scheme = if origin_url.scheme() == "https" {
        "wss"
    } else {
        "ws"
    };

    let raw = format!("{}://{}:{}{}", scheme, host, port, RELAY_PATH);
    Url::parse(&raw).map_err(|e| EndpointError::InvalidUrl(raw.clone(), e.to_string()))
}

/// Parse an explicit relay URL
pub fn parse_relay_url(raw: &str) -> Result<Url, EndpointError> {
    let url = Url::parse(raw).map_err(|e| EndpointError::InvalidUrl(raw.to_string(), e.to_string()))?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(EndpointError::UnsupportedScheme(other.to_string())),
    }
}
