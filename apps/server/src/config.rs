use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use anyhow::{ensure, Context};
use axum::http::HeaderValue;
use donation_relay_core::constants::MAX_RETAINED_DONATIONS;

pub const DEFAULT_PORT: u16 = 3000;

/// Upper bound for `RELAY_BUFFER_CAPACITY`
pub const MAX_BUFFER_CAPACITY: usize = 100_000;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub buffer_capacity: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let port: u16 = env_or("PORT", &DEFAULT_PORT.to_string())
            .parse()
            .context("Invalid PORT")?;
        let host: IpAddr = env_or("RELAY_HOST", "0.0.0.0")
            .parse()
            .context("Invalid RELAY_HOST")?;
        let cors_allow: Vec<String> = env_or("RELAY_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in cors_allow.iter().filter(|o| o.as_str() != "*") {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid origin in RELAY_CORS_ALLOW_ORIGINS: {origin}"))?;
        }
        let timeout_ms: u64 = env_or("RELAY_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .context("Invalid RELAY_REQUEST_TIMEOUT_MS")?;
        let buffer_capacity: usize = env_or(
            "RELAY_BUFFER_CAPACITY",
            &MAX_RETAINED_DONATIONS.to_string(),
        )
        .parse()
        .context("Invalid RELAY_BUFFER_CAPACITY")?;
        ensure!(buffer_capacity >= 1, "RELAY_BUFFER_CAPACITY must be at least 1");
        ensure!(
            buffer_capacity <= MAX_BUFFER_CAPACITY,
            "RELAY_BUFFER_CAPACITY must be at most {MAX_BUFFER_CAPACITY}"
        );

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            buffer_capacity,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            buffer_capacity: MAX_RETAINED_DONATIONS,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
