// OpenAPI document generation
//
// Used by the API server (/api-doc/openapi.json) and the export-openapi
// binary (static document export).

use crate::api;
use crate::api::{ErrorResponse, ListResponse};
use llmhub_core::{
    ActionResult, ActionStatus, AvailableModel, CustomModelInput, CustomProviderInput, Model,
    ModelOrder, ProviderOrder, ProviderSettings, ProviderSettingsPatch, ProviderSummary,
    RecordKind,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the llmhub registry API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::registry::upsert_provider_settings,
        api::registry::list_provider_settings,
        api::registry::list_provider_summaries,
        api::registry::list_active_providers,
        api::registry::reorder_providers,
        api::registry::reorder_models,
        api::registry::add_custom_provider,
        api::registry::delete_custom_provider,
        api::registry::list_models,
        api::registry::list_available_models,
        api::registry::set_model_selected,
        api::registry::delete_model,
        api::registry::add_custom_model,
        api::registry::update_custom_model,
    ),
    components(
        schemas(
            ProviderSettings, ProviderSummary, ProviderSettingsPatch, CustomProviderInput,
            Model, AvailableModel, CustomModelInput,
            ModelOrder, ProviderOrder,
            ActionResult, ActionStatus, RecordKind,
            api::registry::SetModelSelectedRequest,
            ErrorResponse,
            ListResponse<ProviderSettings>,
            ListResponse<ProviderSummary>,
            ListResponse<Model>,
            ListResponse<AvailableModel>,
        )
    ),
    tags(
        (name = "llm-settings", description = "Full provider configuration (admin)"),
        (name = "llm-providers", description = "Provider listings and ordering"),
        (name = "custom-providers", description = "User-defined providers (admin)"),
        (name = "llm-models", description = "Model listings, selection and deletion"),
        (name = "custom-models", description = "User-defined models")
    ),
    info(
        title = "llmhub API",
        version = "0.1.0",
        description = "Registry of LLM providers and the models they offer",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI document as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}
