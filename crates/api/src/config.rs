//! Startup configuration read from the environment.

use std::net::SocketAddr;

pub const BIND_ADDR_ENV: &str = "PRICEBOOK_BIND_ADDR";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Invalid values fall back to defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = match lookup(BIND_ADDR_ENV) {
            None => {
                tracing::info!("{BIND_ADDR_ENV} not set; using {DEFAULT_BIND_ADDR}");
                default_bind_addr()
            }
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!("{BIND_ADDR_ENV}='{raw}' is not a socket address ({e}); using {DEFAULT_BIND_ADDR}");
                default_bind_addr()
            }),
        };

        Self { bind_addr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = ApiConfig::from_lookup(|_| None);
        assert_eq!(cfg, ApiConfig::default());
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn reads_bind_addr() {
        let cfg = ApiConfig::from_lookup(|k| (k == BIND_ADDR_ENV).then(|| "127.0.0.1:9000".to_string()));
        assert_eq!(cfg.bind_addr.port(), 9000);
    }

    #[test]
    fn invalid_bind_addr_falls_back() {
        let cfg = ApiConfig::from_lookup(|_| Some("not an address".to_string()));
        assert_eq!(cfg, ApiConfig::default());
    }
}
