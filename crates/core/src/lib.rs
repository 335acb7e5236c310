// llmhub core types
//
// This crate holds the DB-agnostic side of the provider/model registry:
// - Entity and request types shared by the registry service and the HTTP API
// - The explicit session context checked by admin-gated operations
// - The registry error type and localized business-rule failure messages
// - Logging initialization shared by binaries

// Logging
pub mod telemetry;

// Domain entity types
pub mod llm_registry;
pub mod session;

pub mod error;
pub mod i18n;

// Re-exports for convenience
pub use error::{RegistryError, Result};
pub use i18n::{normalize_locale, t, FailureReason, DEFAULT_LOCALE};
pub use llm_registry::{
    ActionResult, ActionStatus, AvailableModel, CustomModelInput, CustomProviderInput, Model,
    ModelOrder, ProviderOrder, ProviderSettings, ProviderSettingsPatch, ProviderSummary,
    RecordKind, DEFAULT_API_STYLE, DEFAULT_ORDER, UNTITLED_PROVIDER_NAME,
};
pub use session::{SessionContext, SessionUser};
