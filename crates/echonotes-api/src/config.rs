//! Server configuration from environment variables.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use echonotes_core::defaults;

/// Settings read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Raw `ALLOWED_ORIGINS` value, parsed by [`parse_allowed_origins`].
    pub allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: defaults::SERVER_PORT,
            allowed_origins: defaults::ALLOWED_ORIGINS.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read `DATABASE_URL`, `HOST`, `PORT` and `ALLOWED_ORIGINS` over the
    /// defaults. An unparsable `PORT` falls back to the default port.
    pub fn from_env() -> Self {
        let fallback = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(fallback.database_url),
            host: std::env::var("HOST").unwrap_or(fallback.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(fallback.port),
            allowed_origins: std::env::var("ALLOWED_ORIGINS").unwrap_or(fallback.allowed_origins),
        }
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Parse a comma-separated origin whitelist for CORS.
///
/// Blank entries are skipped and invalid ones are logged and dropped. An
/// empty list falls back to the default frontend origins; wildcards are
/// never produced.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    let parsed: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect();

    if parsed.is_empty() && origins != defaults::ALLOWED_ORIGINS {
        return parse_allowed_origins(defaults::ALLOWED_ORIGINS);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_origin() {
        let origins = parse_allowed_origins("https://echo-notes-app.vercel.app");
        assert_eq!(origins.len(), 1);
        assert_eq!(
            origins[0].to_str().unwrap(),
            "https://echo-notes-app.vercel.app"
        );
    }

    #[test]
    fn test_multiple_origins_with_whitespace() {
        let origins = parse_allowed_origins(" https://a.example , http://localhost:5173 ,");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1].to_str().unwrap(), "http://localhost:5173");
    }

    #[test]
    fn test_empty_uses_defaults() {
        let origins = parse_allowed_origins("  ");
        let values: Vec<&str> = origins.iter().map(|o| o.to_str().unwrap()).collect();
        assert_eq!(
            values,
            vec!["https://echo-notes-app.vercel.app", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind_addr().unwrap().port(), 8000);
    }
}
