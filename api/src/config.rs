//! Runtime configuration, from flags or environment.
//!
//! Parsed once at startup and handed to constructors by value; nothing reads
//! it from global state afterwards.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Parser)]
#[command(name = "employee-api", about = "REST façade over the upstream employee API")]
pub struct Config {
    /// Address the façade listens on.
    #[arg(long, env = "EMPLOYEE_API_BIND", default_value = "127.0.0.1:8111")]
    pub bind: SocketAddr,

    /// Upstream collection endpoint; records live at `{base}/{id}`.
    #[arg(
        long,
        env = "EMPLOYEE_API_UPSTREAM_BASE_URL",
        default_value = "http://localhost:8112/api/v1/employee"
    )]
    pub upstream_base_url: Url,

    /// Per-call upstream transport timeout.
    #[arg(long, env = "EMPLOYEE_API_UPSTREAM_TIMEOUT_MS", default_value_t = 5_000)]
    pub upstream_timeout_ms: u64,

    /// Whole-request timeout applied to every inbound request. Must exceed
    /// two upstream timeouts, since delete-by-id makes two sequential calls.
    #[arg(long, env = "EMPLOYEE_API_REQUEST_TIMEOUT_MS", default_value_t = 15_000)]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("upstream base url must be http or https, got {0}")]
    UnsupportedScheme(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error(
        "request timeout ({request_ms} ms) must exceed twice the upstream timeout ({upstream_ms} ms)"
    )]
    RequestTimeoutTooShort { request_ms: u64, upstream_ms: u64 },
}

/// Upstream calls one inbound request may chain (delete-by-id: lookup, delete).
const MAX_SEQUENTIAL_UPSTREAM_CALLS: u64 = 2;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.upstream_base_url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
        if self.upstream_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("upstream timeout"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("request timeout"));
        }
        if self.request_timeout_ms
            <= self
                .upstream_timeout_ms
                .saturating_mul(MAX_SEQUENTIAL_UPSTREAM_CALLS)
        {
            return Err(ConfigError::RequestTimeoutTooShort {
                request_ms: self.request_timeout_ms,
                upstream_ms: self.upstream_timeout_ms,
            });
        }
        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
