// Database models (internal, may differ from public DTOs)
//
// `order` and `type` are reserved words in SQL; the columns keep those names
// (quoted in queries) and map to `sort_order` / `kind` here.

use sqlx::FromRow;

// ============================================
// Providers (llm_settings table)
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ProviderRow {
    pub provider: String,
    pub provider_name: String,
    pub is_active: bool,
    pub api_style: String,
    pub logo: Option<String>,
    pub endpoint: Option<String>,
    pub apikey: Option<String>,
    #[sqlx(rename = "order")]
    pub sort_order: i32,
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// Provider projection without credentials
#[derive(Debug, Clone, FromRow)]
pub struct ProviderSummaryRow {
    pub provider: String,
    pub provider_name: String,
    pub is_active: bool,
    pub api_style: String,
    pub logo: Option<String>,
    #[sqlx(rename = "order")]
    pub sort_order: i32,
}

impl From<&ProviderRow> for ProviderSummaryRow {
    fn from(row: &ProviderRow) -> Self {
        Self {
            provider: row.provider.clone(),
            provider_name: row.provider_name.clone(),
            is_active: row.is_active,
            api_style: row.api_style.clone(),
            logo: row.logo.clone(),
            sort_order: row.sort_order,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateProviderRow {
    pub provider: String,
    pub provider_name: String,
    pub is_active: bool,
    pub api_style: String,
    pub logo: Option<String>,
    pub endpoint: Option<String>,
    pub apikey: Option<String>,
    pub sort_order: i32,
    pub kind: String,
}

/// Partial provider update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProviderRow {
    pub provider_name: Option<String>,
    pub is_active: Option<bool>,
    pub api_style: Option<String>,
    /// `Some(None)` writes NULL
    pub logo: Option<Option<String>>,
    pub endpoint: Option<Option<String>>,
    pub apikey: Option<Option<String>>,
    pub sort_order: Option<i32>,
}

// ============================================
// Models (models table)
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ModelRow {
    pub name: String,
    pub provider_id: String,
    pub provider_name: String,
    pub display_name: String,
    pub max_tokens: Option<i32>,
    pub support_vision: bool,
    pub selected: bool,
    #[sqlx(rename = "order")]
    pub sort_order: i32,
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// Selected model of an active provider joined with provider display info
#[derive(Debug, Clone, FromRow)]
pub struct AvailableModelRow {
    pub name: String,
    pub provider_id: String,
    /// Display name taken from the provider row, not the model row
    pub provider_name: String,
    pub display_name: String,
    pub max_tokens: Option<i32>,
    pub support_vision: bool,
    pub selected: bool,
    #[sqlx(rename = "order")]
    pub sort_order: i32,
    #[sqlx(rename = "type")]
    pub kind: String,
    /// Empty when the provider has no logo
    pub provider_logo: String,
}

#[derive(Debug, Clone)]
pub struct CreateModelRow {
    pub name: String,
    pub provider_id: String,
    pub provider_name: String,
    pub display_name: String,
    pub max_tokens: Option<i32>,
    pub support_vision: bool,
    pub selected: bool,
    pub sort_order: i32,
    pub kind: String,
}

/// Full replacement of a model's fields. The sort key is not part of it.
#[derive(Debug, Clone)]
pub struct ReplaceModelRow {
    pub name: String,
    pub provider_id: String,
    pub provider_name: String,
    pub display_name: String,
    pub max_tokens: Option<i32>,
    pub support_vision: bool,
    pub selected: bool,
    pub kind: String,
}
