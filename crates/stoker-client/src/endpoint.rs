//! Server endpoint configuration.
//!
//! An [`Endpoint`] names the TCP address of a `stokerd` server. Parsing
//! accepts both the bare `host:port` form and `tcp://host:port` URLs so the
//! value can come from configuration files unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Network address of a `stokerd` server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Builds an endpoint from a host and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the host name or address literal.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Returns the TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(formatter, "[{}]:{}", self.host, self.port)
        } else {
            write!(formatter, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.contains("://") {
            let url = Url::parse(input)?;
            if url.scheme() != "tcp" {
                return Err(EndpointParseError::UnsupportedScheme(
                    url.scheme().to_string(),
                ));
            }
            let host = url
                .host_str()
                .ok_or_else(|| EndpointParseError::MissingHost(input.to_string()))?;
            let port = url
                .port()
                .ok_or_else(|| EndpointParseError::MissingPort(input.to_string()))?;
            return Ok(Self::new(trim_brackets(host), port));
        }

        let (host, port) = input
            .rsplit_once(':')
            .ok_or_else(|| EndpointParseError::MissingPort(input.to_string()))?;
        if host.is_empty() {
            return Err(EndpointParseError::MissingHost(input.to_string()));
        }
        let port = port
            .parse()
            .map_err(|_| EndpointParseError::InvalidPort(input.to_string()))?;
        Ok(Self::new(trim_brackets(host), port))
    }
}

/// Strips the square brackets of an IPv6 address literal.
fn trim_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(host)
}

/// Errors encountered while parsing an [`Endpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// Scheme other than `tcp` in URL form.
    #[error("unsupported endpoint scheme '{0}'")]
    UnsupportedScheme(String),
    /// Host was missing or empty.
    #[error("missing host in '{0}'")]
    MissingHost(String),
    /// No port separator was found.
    #[error("missing TCP port in '{0}'")]
    MissingPort(String),
    /// Port was present but not a valid 16-bit integer.
    #[error("invalid TCP port in '{0}'")]
    InvalidPort(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}
