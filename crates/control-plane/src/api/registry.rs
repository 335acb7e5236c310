// LLM provider/model registry API endpoints
//
// Thin adapter: resolves the caller's session, calls RegistryService and maps
// RegistryError to HTTP statuses. No business rules live here.

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use llmhub_core::{
    ActionResult, AvailableModel, CustomModelInput, CustomProviderInput, Model, ModelOrder,
    ProviderOrder, ProviderSettings, ProviderSettingsPatch, ProviderSummary,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::common::{registry_error, ApiError, ListResponse};
use crate::auth::{AuthState, Session};
use crate::services::RegistryService;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RegistryService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(registry: RegistryService, auth: AuthState) -> Self {
        Self {
            registry: Arc::new(registry),
            auth,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Query parameters for listing models
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListModelsQuery {
    /// Only return models of this provider, ordered by `order`.
    pub provider_id: Option<String>,
}

/// Request to toggle a model's membership in the available set
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SetModelSelectedRequest {
    #[schema(example = true)]
    pub selected: bool,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/llm-settings", get(list_provider_settings))
        .route("/v1/llm-settings/:provider", put(upsert_provider_settings))
        .route("/v1/llm-providers", get(list_provider_summaries))
        .route("/v1/llm-providers/active", get(list_active_providers))
        .route("/v1/llm-providers/order", put(reorder_providers))
        .route(
            "/v1/llm-providers/:provider/models/order",
            put(reorder_models),
        )
        .route("/v1/custom-providers", post(add_custom_provider))
        .route(
            "/v1/custom-providers/:provider",
            delete(delete_custom_provider),
        )
        .route("/v1/llm-models", get(list_models))
        .route("/v1/llm-models/available", get(list_available_models))
        .route("/v1/llm-models/:name", delete(delete_model))
        .route("/v1/llm-models/:name/selected", put(set_model_selected))
        .route("/v1/custom-models", post(add_custom_model))
        .route("/v1/custom-models/:name", put(update_custom_model))
        .with_state(state)
}

// ============================================
// Providers
// ============================================

/// PUT /v1/llm-settings/{provider} - Update or insert provider settings
#[utoipa::path(
    put,
    path = "/v1/llm-settings/{provider}",
    params(("provider" = String, Path, description = "Provider identifier")),
    request_body = ProviderSettingsPatch,
    responses(
        (status = 204, description = "Settings saved"),
        (status = 403, description = "Admin session required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "llm-settings"
)]
pub async fn upsert_provider_settings(
    State(state): State<AppState>,
    Session(session): Session,
    Path(provider): Path<String>,
    Json(patch): Json<ProviderSettingsPatch>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .upsert_provider_settings(&session, &provider, patch)
        .await
        .map_err(|e| registry_error("upsert provider settings", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/llm-settings - Full provider settings, including credentials
#[utoipa::path(
    get,
    path = "/v1/llm-settings",
    responses(
        (status = 200, description = "Providers ordered by sort key", body = ListResponse<ProviderSettings>),
        (status = 403, description = "Admin session required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "llm-settings"
)]
pub async fn list_provider_settings(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<Json<ListResponse<ProviderSettings>>, ApiError> {
    let providers = state
        .registry
        .list_provider_settings(&session)
        .await
        .map_err(|e| registry_error("list provider settings", e))?;

    Ok(Json(ListResponse::new(providers)))
}

/// GET /v1/llm-providers - Non-sensitive summary of every provider
#[utoipa::path(
    get,
    path = "/v1/llm-providers",
    responses(
        (status = 200, description = "Provider summaries", body = ListResponse<ProviderSummary>),
        (status = 500, description = "Internal server error")
    ),
    tag = "llm-providers"
)]
pub async fn list_provider_summaries(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<ProviderSummary>>, ApiError> {
    let providers = state
        .registry
        .list_provider_summaries()
        .await
        .map_err(|e| registry_error("list provider summaries", e))?;

    Ok(Json(ListResponse::new(providers)))
}

/// GET /v1/llm-providers/active - Active providers
#[utoipa::path(
    get,
    path = "/v1/llm-providers/active",
    responses(
        (status = 200, description = "Active providers ordered by sort key", body = ListResponse<ProviderSummary>),
        (status = 500, description = "Internal server error")
    ),
    tag = "llm-providers"
)]
pub async fn list_active_providers(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<ProviderSummary>>, ApiError> {
    let providers = state
        .registry
        .list_active_providers()
        .await
        .map_err(|e| registry_error("list active providers", e))?;

    Ok(Json(ListResponse::new(providers)))
}

/// PUT /v1/llm-providers/order - Apply new provider sort keys
#[utoipa::path(
    put,
    path = "/v1/llm-providers/order",
    request_body = Vec<ProviderOrder>,
    responses(
        (status = 204, description = "Order updates applied"),
        (status = 403, description = "Admin session required"),
        (status = 500, description = "One or more updates failed; others may be applied")
    ),
    tag = "llm-providers"
)]
pub async fn reorder_providers(
    State(state): State<AppState>,
    Session(session): Session,
    Json(orders): Json<Vec<ProviderOrder>>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .reorder_providers(&session, orders)
        .await
        .map_err(|e| registry_error("reorder providers", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/llm-providers/{provider}/models/order - Apply new model sort keys
#[utoipa::path(
    put,
    path = "/v1/llm-providers/{provider}/models/order",
    params(("provider" = String, Path, description = "Provider identifier")),
    request_body = Vec<ModelOrder>,
    responses(
        (status = 204, description = "Order updates applied"),
        (status = 403, description = "Admin session required"),
        (status = 500, description = "One or more updates failed; others may be applied")
    ),
    tag = "llm-providers"
)]
pub async fn reorder_models(
    State(state): State<AppState>,
    Session(session): Session,
    Path(provider): Path<String>,
    Json(orders): Json<Vec<ModelOrder>>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .reorder_models(&session, &provider, orders)
        .await
        .map_err(|e| registry_error("reorder models", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/custom-providers - Register a user-defined provider
#[utoipa::path(
    post,
    path = "/v1/custom-providers",
    request_body = CustomProviderInput,
    responses(
        (status = 200, description = "Outcome; fails when the provider id is taken", body = ActionResult),
        (status = 403, description = "Admin session required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "custom-providers"
)]
pub async fn add_custom_provider(
    State(state): State<AppState>,
    Session(session): Session,
    Json(input): Json<CustomProviderInput>,
) -> Result<Json<ActionResult>, ApiError> {
    let result = state
        .registry
        .add_custom_provider(&session, input)
        .await
        .map_err(|e| registry_error("add custom provider", e))?;

    Ok(Json(result))
}

/// DELETE /v1/custom-providers/{provider} - Delete a provider and its models
#[utoipa::path(
    delete,
    path = "/v1/custom-providers/{provider}",
    params(("provider" = String, Path, description = "Provider identifier")),
    responses(
        (status = 200, description = "Provider deleted", body = ActionResult),
        (status = 403, description = "Admin session required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "custom-providers"
)]
pub async fn delete_custom_provider(
    State(state): State<AppState>,
    Session(session): Session,
    Path(provider): Path<String>,
) -> Result<Json<ActionResult>, ApiError> {
    let result = state
        .registry
        .delete_custom_provider(&session, &provider)
        .await
        .map_err(|e| registry_error("delete custom provider", e))?;

    Ok(Json(result))
}

// ============================================
// Models
// ============================================

/// GET /v1/llm-models - All models, or the models of one provider
#[utoipa::path(
    get,
    path = "/v1/llm-models",
    params(ListModelsQuery),
    responses(
        (status = 200, description = "Models", body = ListResponse<Model>),
        (status = 500, description = "Internal server error")
    ),
    tag = "llm-models"
)]
pub async fn list_models(
    State(state): State<AppState>,
    Query(query): Query<ListModelsQuery>,
) -> Result<Json<ListResponse<Model>>, ApiError> {
    let models = state
        .registry
        .list_models(query.provider_id.as_deref())
        .await
        .map_err(|e| registry_error("list models", e))?;

    Ok(Json(ListResponse::new(models)))
}

/// GET /v1/llm-models/available - Selected models of active providers
#[utoipa::path(
    get,
    path = "/v1/llm-models/available",
    responses(
        (status = 200, description = "Available models ordered by provider then model", body = ListResponse<AvailableModel>),
        (status = 500, description = "Internal server error")
    ),
    tag = "llm-models"
)]
pub async fn list_available_models(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<AvailableModel>>, ApiError> {
    let models = state
        .registry
        .list_available_models()
        .await
        .map_err(|e| registry_error("list available models", e))?;

    Ok(Json(ListResponse::new(models)))
}

/// PUT /v1/llm-models/{name}/selected - Set the selected flag
#[utoipa::path(
    put,
    path = "/v1/llm-models/{name}/selected",
    params(("name" = String, Path, description = "Model name")),
    request_body = SetModelSelectedRequest,
    responses(
        (status = 204, description = "Flag written"),
        (status = 500, description = "Internal server error")
    ),
    tag = "llm-models"
)]
pub async fn set_model_selected(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<SetModelSelectedRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .set_model_selected(&name, req.selected)
        .await
        .map_err(|e| registry_error("set model selected", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/llm-models/{name} - Delete a model
#[utoipa::path(
    delete,
    path = "/v1/llm-models/{name}",
    params(("name" = String, Path, description = "Model name")),
    responses(
        (status = 204, description = "Model deleted"),
        (status = 403, description = "Admin session required"),
        (status = 500, description = "Internal server error")
    ),
    tag = "llm-models"
)]
pub async fn delete_model(
    State(state): State<AppState>,
    Session(session): Session,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .delete_model(&session, &name)
        .await
        .map_err(|e| registry_error("delete model", e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/custom-models - Add a user-defined model
#[utoipa::path(
    post,
    path = "/v1/custom-models",
    request_body = CustomModelInput,
    responses(
        (status = 200, description = "Outcome; fails on duplicates or unknown provider", body = ActionResult),
        (status = 500, description = "Internal server error")
    ),
    tag = "custom-models"
)]
pub async fn add_custom_model(
    State(state): State<AppState>,
    Session(session): Session,
    Json(input): Json<CustomModelInput>,
) -> Result<Json<ActionResult>, ApiError> {
    let result = state
        .registry
        .add_custom_model(&session, input)
        .await
        .map_err(|e| registry_error("add custom model", e))?;

    Ok(Json(result))
}

/// PUT /v1/custom-models/{name} - Replace a user-defined model
#[utoipa::path(
    put,
    path = "/v1/custom-models/{name}",
    params(("name" = String, Path, description = "Current model name")),
    request_body = CustomModelInput,
    responses(
        (status = 200, description = "Outcome; fails when the model is gone", body = ActionResult),
        (status = 500, description = "Internal server error")
    ),
    tag = "custom-models"
)]
pub async fn update_custom_model(
    State(state): State<AppState>,
    Session(session): Session,
    Path(name): Path<String>,
    Json(input): Json<CustomModelInput>,
) -> Result<Json<ActionResult>, ApiError> {
    let result = state
        .registry
        .update_custom_model(&session, &name, input)
        .await
        .map_err(|e| registry_error("update custom model", e))?;

    Ok(Json(result))
}
