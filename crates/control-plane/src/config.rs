// Server configuration loaded from environment variables
//
// - DATABASE_URL: Postgres connection string; unset selects the in-memory backend
// - RUN_MIGRATIONS: apply embedded migrations on startup (default: true)
// - HTTP_ADDR: listen address (default: 0.0.0.0:9000)
// - API_PREFIX: path prefix for API routes, e.g. "/api" (default: empty)
// - CORS_ALLOWED_ORIGINS: comma-separated origins (default: same-origin only)

use axum::http::HeaderValue;

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:9000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: Option<String>,
    pub run_migrations: bool,
    pub http_addr: String,
    pub api_prefix: String,
    pub cors_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            run_migrations: true,
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            api_prefix: String::new(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            run_migrations: std::env::var("RUN_MIGRATIONS")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            http_addr: std::env::var("HTTP_ADDR")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
            api_prefix: normalize_prefix(&std::env::var("API_PREFIX").unwrap_or_default()),
            cors_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| parse_origins(&s))
                .unwrap_or_default(),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// "api/" and "/api/" both become "/api"; "/" and "" become empty
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn parse_origins(value: &str) -> Vec<HeaderValue> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert!(config.database_url.is_none());
        assert!(config.run_migrations);
        assert_eq!(config.http_addr, "0.0.0.0:9000");
        assert!(config.api_prefix.is_empty());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(" OFF "));
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/api/"), "/api");
    }

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("https://a.example.com, https://b.example.com,,");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://a.example.com");
    }
}
