// Authentication for the HTTP adapter
//
// Resolves the caller's SessionContext from a bearer token or cookie. The
// registry service does the admin checks itself.

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::{AuthConfig, AuthMode, JwtConfig};
pub use jwt::{AccessTokenClaims, JwtService};
pub use middleware::{resolve_session, AuthState, Session, ACCESS_TOKEN_COOKIE};
