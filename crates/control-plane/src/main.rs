// llmhub API server
// Decision: No DATABASE_URL means dev mode with the in-memory backend
// Decision: Auth defaults to "none" (every caller is the local admin)

use anyhow::{Context, Result};
use axum::http::{header, Method};
use axum::{extract::State, routing::get, Json, Router};
use llmhub_control_plane::{
    api,
    auth::{AuthConfig, AuthMode, AuthState},
    config::ServerConfig,
    openapi::ApiDoc,
    storage::{EncryptionService, StorageBackend},
    RegistryService,
};
use llmhub_core::telemetry::{init_telemetry, TelemetryConfig};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    auth_mode: String,
    storage: &'static str,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    auth_mode: String,
    storage: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        auth_mode: state.auth_mode.clone(),
        storage: state.storage,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // RUST_LOG / LOG_LEVEL override the default filter
    let mut telemetry_config = TelemetryConfig::from_env();
    telemetry_config.service_name = "llmhub-control-plane".to_string();
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter = Some("llmhub=debug,tower_http=debug".to_string());
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    init_telemetry(telemetry_config);

    tracing::info!("llmhub-control-plane starting...");

    let config = ServerConfig::from_env();

    // Storage backend
    let db = match &config.database_url {
        Some(url) => {
            let db = StorageBackend::postgres(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");
            if config.run_migrations {
                db.migrate().await.context("Failed to run migrations")?;
                tracing::info!("Database migrations applied");
            }
            db
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
            StorageBackend::in_memory()
        }
    };

    // API key encryption (optional - keys are stored as plaintext without it)
    let encryption = match EncryptionService::from_env()
        .context("Invalid SECRETS_ENCRYPTION_KEY")?
    {
        Some(svc) => {
            tracing::info!("Encryption service initialized for API key storage");
            Some(Arc::new(svc))
        }
        None => {
            tracing::warn!("SECRETS_ENCRYPTION_KEY not set, provider API keys are stored in plaintext");
            None
        }
    };

    let auth_config = AuthConfig::from_env().context("Invalid auth configuration")?;
    tracing::info!(mode = ?auth_config.mode, "Authentication configured");
    if auth_config.mode == AuthMode::None {
        tracing::warn!("AUTH_MODE=none: every request is treated as an administrator");
    }

    let health_state = HealthState {
        auth_mode: format!("{:?}", auth_config.mode),
        storage: if db.is_dev_mode() { "memory" } else { "postgres" },
    };

    let registry = RegistryService::new(db, encryption);
    let app_state = api::AppState::new(registry, AuthState::new(auth_config));

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }

    // Health is never prefixed
    let app = Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(build_router_with_prefix(
            api::routes(app_state),
            &config.api_prefix,
        ))
        .route(
            "/api-doc/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );

    // Add CORS layer only if origins are configured
    let app = if !config.cors_origins.is_empty() {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ACCEPT_LANGUAGE,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    };

    let app = app.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", config.http_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
