//! Server Configuration
//!
//! Resolved once at startup from CLI flags, then environment, then defaults.

use std::net::SocketAddr;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Default HTTP bind address
pub const HTTP_BIND_ADDRESS_DEFAULT: &str = "127.0.0.1:8080";

/// Environment variable overriding the default bind address
pub const BIND_ADDRESS_ENV_VAR: &str = "CATSGRAM_BIND";

// =============================================================================
// Types
// =============================================================================

/// Effective server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind: SocketAddr,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl ServerConfig {
    /// Pick the bind address (flag beats env beats default) and log filter
    pub fn resolve(
        cli_bind: Option<&str>,
        env_bind: Option<&str>,
        verbose: u8,
    ) -> Result<Self, ConfigError> {
        let raw = cli_bind
            .or(env_bind.filter(|s| !s.trim().is_empty()))
            .unwrap_or(HTTP_BIND_ADDRESS_DEFAULT);

        let bind = raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress(raw.to_string()))?;

        Ok(Self {
            bind,
            log_filter: log_filter(verbose).to_string(),
        })
    }
}

/// Tracing filter for a `-v` count
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info,tower_http=debug",
        1 => "debug",
        _ => "trace",
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),
}
