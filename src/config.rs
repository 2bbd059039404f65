//! Server configuration
//!
//! All settings come from environment variables, with defaults suited to
//! local development:
//!
//! - `RECIPEKIT_PORT`: listen port (default: 5001)
//! - `RECIPEKIT_BIND_ALL`: set to "true" to bind 0.0.0.0 instead of 127.0.0.1
//! - `RECIPEKIT_ALLOWED_ORIGINS`: comma-separated CORS origins
//!   (default: `http://localhost:5173`)
//! - `RECIPEKIT_FETCH_TIMEOUT_MS`: page fetch timeout (default: 10000)
//! - `RECIPEKIT_USER_AGENT`: User-Agent sent when fetching pages

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::{info, warn};

use crate::error::ConfigError;
use crate::fetch::FetchConfig;

/// Default listen port
pub const DEFAULT_PORT: u16 = 5001;

/// Default allowed CORS origin (the web front end dev server)
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub bind_addr: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
    /// Page fetch settings
    pub fetch: FetchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            fetch: FetchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("RECIPEKIT_PORT") {
            config.port = parse_var("RECIPEKIT_PORT", &port)?;
        }

        let bind_all = lookup("RECIPEKIT_BIND_ALL")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if bind_all {
            warn!("Binding to 0.0.0.0 (RECIPEKIT_BIND_ALL=true)");
            config.bind_addr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        }

        if let Some(origins) = lookup("RECIPEKIT_ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(timeout) = lookup("RECIPEKIT_FETCH_TIMEOUT_MS") {
            let timeout_ms: u64 = parse_var("RECIPEKIT_FETCH_TIMEOUT_MS", &timeout)?;
            if timeout_ms == 0 {
                return Err(ConfigError::InvalidValue {
                    name: "RECIPEKIT_FETCH_TIMEOUT_MS".to_string(),
                    reason: "timeout cannot be 0".to_string(),
                });
            }
            config.fetch.timeout_ms = timeout_ms;
        }

        if let Some(agent) = lookup("RECIPEKIT_USER_AGENT").filter(|a| !a.trim().is_empty()) {
            config.fetch.user_agent = agent;
        }

        info!(
            "Config: bind={}:{}, origins={:?}, fetch_timeout={}ms",
            config.bind_addr, config.port, config.allowed_origins, config.fetch.timeout_ms
        );

        Ok(config)
    }

    /// The socket address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
