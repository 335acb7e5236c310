// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: Default to "none" mode for local development

use anyhow::{bail, Result};
use rand::Rng;
use std::time::Duration;

/// Authentication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No authentication; every caller is the local administrator
    #[default]
    None,
    /// HS256 bearer tokens or the access_token cookie
    Jwt,
}

impl AuthMode {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "jwt" => AuthMode::Jwt,
            _ => AuthMode::None,
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWTs
    pub secret: String,
    /// Lifetime of tokens issued by this service
    pub access_token_lifetime: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_lifetime: Duration::from_secs(15 * 60), // 15 minutes
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            std::env::var("AUTH_MODE").ok().as_deref(),
            std::env::var("AUTH_JWT_SECRET").ok(),
            std::env::var("AUTH_JWT_ACCESS_TOKEN_LIFETIME").ok().as_deref(),
        )
    }

    /// Build configuration from raw variable values.
    ///
    /// Tokens carry the admin flag, so jwt mode refuses to start without a
    /// signing secret.
    pub fn from_values(
        mode: Option<&str>,
        secret: Option<String>,
        access_token_lifetime: Option<&str>,
    ) -> Result<Self> {
        let mode = mode.map(AuthMode::from_str).unwrap_or_default();

        let secret = match (secret.filter(|s| !s.is_empty()), mode) {
            (Some(secret), _) => secret,
            (None, AuthMode::Jwt) => bail!("AUTH_JWT_SECRET is required when AUTH_MODE=jwt"),
            (None, AuthMode::None) => {
                // Random secret for dev mode; tokens are never checked
                let bytes: [u8; 32] = rand::thread_rng().gen();
                hex::encode(bytes)
            }
        };

        let access_token_lifetime = access_token_lifetime
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(15 * 60));

        Ok(Self {
            mode,
            jwt: JwtConfig {
                secret,
                access_token_lifetime,
            },
        })
    }
}
