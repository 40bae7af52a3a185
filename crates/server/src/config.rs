use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3001));

/// Server configuration read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub systems_dir: PathBuf,
    pub sprite_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// `SYSTEMS_DIR`, `SPRITE_DIR` and `BIND_ADDR`. Unset or unparsable
    /// values fall back to `./systems`, `./sprites` and [`DEFAULT_BIND_ADDR`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dir = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring BIND_ADDR '{}': {}", raw, e);
                DEFAULT_BIND_ADDR
            }),
            None => DEFAULT_BIND_ADDR,
        };
        Self {
            systems_dir: dir("SYSTEMS_DIR", "systems"),
            sprite_dir: dir("SPRITE_DIR", "sprites"),
            bind_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]);
        assert_eq!(c.systems_dir, PathBuf::from("systems"));
        assert_eq!(c.sprite_dir, PathBuf::from("sprites"));
        assert_eq!(c.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("SYSTEMS_DIR", "/data/systems"),
            ("SPRITE_DIR", "/data/sprites"),
            ("BIND_ADDR", "0.0.0.0:8080"),
        ]);
        assert_eq!(c.systems_dir, PathBuf::from("/data/systems"));
        assert_eq!(c.sprite_dir, PathBuf::from("/data/sprites"));
        assert_eq!(c.bind_addr.port(), 8080);
    }

    #[test]
    fn test_bad_bind_addr_falls_back() {
        let c = config(&[("BIND_ADDR", "not an address"), ("SYSTEMS_DIR", "  ")]);
        assert_eq!(c.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(c.systems_dir, PathBuf::from("systems"));
    }
}
