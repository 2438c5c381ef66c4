//! Server configuration from environment variables.
//!
//! `HOST` (default 0.0.0.0), `PORT` (default 8080), `DATA_FILE` (optional JSON store path;
//! unset keeps everything in memory), `ADMIN_TOKEN` (secret for mutating requests).

use std::path::PathBuf;

const DEFAULT_ADMIN_TOKEN: &str = "admin";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: Option<PathBuf>,
    pub admin_token: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` (used by tests to avoid touching the real env).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(default_host);
        let port = match lookup("PORT") {
            None => default_port(),
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Invalid PORT {:?}, using {}", raw, default_port());
                default_port()
            }),
        };
        let data_file = lookup("DATA_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let admin_token = match lookup("ADMIN_TOKEN").filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                log::warn!("ADMIN_TOKEN not set; using the default token");
                DEFAULT_ADMIN_TOKEN.to_string()
            }
        };
        Self {
            host,
            port,
            data_file,
            admin_token,
        }
    }
}
