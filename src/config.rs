//! Server configuration.
//!
//! Values come from CLI flags, each of which falls back to a `TODO_LIST_*`
//! environment variable (see `main.rs`).

use std::path::PathBuf;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file. `None` uses the platform data directory.
    pub database: Option<PathBuf>,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: None,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        if self.cors_origins.is_empty() {
            return CorsLayer::permissive();
        }

        let origins: Vec<HeaderValue> = self
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_localhost() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert!(config.database.is_none());
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn bind_addr_uses_host_and_port() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn cors_layer_accepts_origin_list() {
        let config = ServerConfig {
            cors_origins: vec![
                "https://todo.example.com".to_string(),
                "https://bad\u{7f}origin".to_string(),
            ],
            ..Default::default()
        };
        // Invalid entries are skipped.
        let _layer = config.cors_layer();
    }
}
