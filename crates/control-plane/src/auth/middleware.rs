// Session extraction for HTTP handlers
// Decision: Support both cookie-based (UI) and header-based (API) auth
// Decision: In "none" mode, every request is the local administrator
// Decision: Missing or invalid credentials never reject the request; the
//           caller becomes anonymous and admin-gated operations refuse it

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;
use llmhub_core::{SessionContext, SessionUser, DEFAULT_LOCALE};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    config::{AuthConfig, AuthMode},
    jwt::JwtService,
};

/// Cookie carrying the access token for browser clients
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub jwt_service: Arc<JwtService>,
}

impl AuthState {
    pub fn new(config: AuthConfig) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        Self {
            config,
            jwt_service,
        }
    }
}

/// Caller session resolved from the request
#[derive(Debug, Clone)]
pub struct Session(pub SessionContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        Ok(Session(resolve_session(&parts.headers, &auth_state)))
    }
}

/// Build the session context for a request
pub fn resolve_session(headers: &HeaderMap, auth_state: &AuthState) -> SessionContext {
    let session = match auth_state.config.mode {
        AuthMode::None => SessionContext::local_admin(),
        AuthMode::Jwt => match extract_user(headers, auth_state) {
            Some(user) => SessionContext::for_user(user),
            None => SessionContext::anonymous(),
        },
    };

    session.with_locale(&request_locale(headers))
}

fn extract_user(headers: &HeaderMap, auth_state: &AuthState) -> Option<SessionUser> {
    // Authorization header first, then the UI cookie
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
    })?;

    let claims = auth_state
        .jwt_service
        .validate_access_token(&token)
        .map_err(|e| tracing::debug!("JWT validation failed: {}", e))
        .ok()?;

    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| tracing::debug!(sub = %claims.sub, "Invalid user ID in token"))
        .ok()?;

    Some(SessionUser {
        id,
        email: claims.email,
        is_admin: claims.is_admin,
    })
}

/// First language tag of Accept-Language, without quality weight
fn request_locale(headers: &HeaderMap) -> String {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|tag| tag.split(';').next().unwrap_or_default().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}
