// LLM provider and model registry entity types
//
// These types are the data-in/data-out shapes of the registry service.
// Field names serialize in camelCase to match the settings UI contract.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::i18n::FailureReason;

/// Default display name for providers inserted without one
pub const UNTITLED_PROVIDER_NAME: &str = "Untitled";

/// Default wire dialect for providers inserted without one
pub const DEFAULT_API_STYLE: &str = "openai";

/// Default sort key for rows inserted without one
pub const DEFAULT_ORDER: i32 = 1;

/// Origin of a provider or model record.
/// - `default`: shipped with the deployment
/// - `custom`: added by a user
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    Default,
    Custom,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Default => write!(f, "default"),
            RecordKind::Custom => write!(f, "custom"),
        }
    }
}

impl From<&str> for RecordKind {
    fn from(s: &str) -> Self {
        match s {
            "custom" => RecordKind::Custom,
            _ => RecordKind::Default,
        }
    }
}

/// Full provider configuration, including credentials.
/// Only returned to administrators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    /// Unique provider identifier (e.g. "openai").
    pub provider: String,
    /// Human-readable provider name.
    pub provider_name: String,
    /// Whether the provider is visible to non-admin consumers.
    pub is_active: bool,
    /// Wire protocol dialect spoken by the provider endpoint.
    pub api_style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,
    /// Display sort key.
    pub order: i32,
    #[serde(rename = "type")]
    pub kind: RecordKind,
}

/// Provider projection without credentials.
/// Safe to return to any caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    pub provider: String,
    pub provider_name: String,
    pub is_active: bool,
    pub api_style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub order: i32,
}

/// Partial provider settings. Only provided fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_style: Option<String>,
    /// Omitted keeps the stored logo, `null` clears it
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub logo: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub endpoint: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub apikey: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// Present-but-null becomes `Some(None)`; an absent field stays `None`
fn deserialize_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ProviderSettingsPatch {
    /// Build the row inserted when the provider does not exist yet
    pub fn into_new_provider(self, provider: &str) -> ProviderSettings {
        ProviderSettings {
            provider: provider.to_string(),
            provider_name: self
                .provider_name
                .unwrap_or_else(|| UNTITLED_PROVIDER_NAME.to_string()),
            is_active: self.is_active.unwrap_or(false),
            api_style: self
                .api_style
                .unwrap_or_else(|| DEFAULT_API_STYLE.to_string()),
            logo: self.logo.flatten(),
            endpoint: self.endpoint.flatten(),
            apikey: self.apikey.flatten(),
            order: self.order.unwrap_or(DEFAULT_ORDER),
            kind: RecordKind::Default,
        }
    }
}

/// Request to register a user-defined provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CustomProviderInput {
    #[cfg_attr(feature = "openapi", schema(example = "my-gateway"))]
    pub provider: String,
    #[cfg_attr(feature = "openapi", schema(example = "My Gateway"))]
    pub provider_name: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(alias = "api_style")]
    #[cfg_attr(feature = "openapi", schema(example = "openai"))]
    pub api_style: String,
    #[serde(default)]
    pub apikey: Option<String>,
}

impl CustomProviderInput {
    pub fn into_settings(self) -> ProviderSettings {
        ProviderSettings {
            provider: self.provider,
            provider_name: self.provider_name,
            is_active: true,
            api_style: self.api_style,
            logo: None,
            endpoint: self.endpoint,
            apikey: self.apikey,
            order: DEFAULT_ORDER,
            kind: RecordKind::Custom,
        }
    }
}

/// A model offered by a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Model name, unique across all providers (e.g. "gpt-4o").
    pub name: String,
    /// Owning provider identifier.
    pub provider_id: String,
    /// Provider display name recorded with the model.
    pub provider_name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,
    pub support_vision: bool,
    /// Whether the model is included in the available set.
    pub selected: bool,
    /// Sort key within the provider.
    pub order: i32,
    #[serde(rename = "type")]
    pub kind: RecordKind,
}

/// Request to add or replace a user-defined model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CustomModelInput {
    #[cfg_attr(feature = "openapi", schema(example = "qwen-max"))]
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub max_tokens: Option<i32>,
    #[serde(default)]
    pub support_vision: bool,
    #[serde(default)]
    pub selected: bool,
    pub provider_id: String,
    pub provider_name: String,
}

impl CustomModelInput {
    /// Custom models always carry the custom kind, whatever the caller sent
    pub fn into_model(self, order: i32) -> Model {
        Model {
            name: self.name,
            provider_id: self.provider_id,
            provider_name: self.provider_name,
            display_name: self.display_name,
            max_tokens: self.max_tokens,
            support_vision: self.support_vision,
            selected: self.selected,
            order,
            kind: RecordKind::Custom,
        }
    }
}

/// Selected model of an active provider, with provider display info attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AvailableModel {
    #[serde(flatten)]
    pub model: Model,
    /// Provider logo, empty when the provider has none.
    pub provider_logo: String,
}

/// New sort key for one model of a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ModelOrder {
    pub model_id: String,
    pub order: i32,
}

/// New sort key for one provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProviderOrder {
    pub provider_id: String,
    pub order: i32,
}

/// Outcome of an operation that can be rejected by a business rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Fail,
}

/// Structured result for expected business-rule violations.
/// Serializes as `{"status":"success"}` or `{"status":"fail","message":"..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ActionResult {
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn success() -> Self {
        Self {
            status: ActionStatus::Success,
            message: None,
        }
    }

    /// Failure with the reason rendered in the caller's locale
    pub fn fail(reason: FailureReason, locale: &str) -> Self {
        Self {
            status: ActionStatus::Fail,
            message: Some(reason.message(locale)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_provider_defaults() {
        let settings = ProviderSettingsPatch::default().into_new_provider("openai");
        assert_eq!(settings.provider, "openai");
        assert_eq!(settings.provider_name, UNTITLED_PROVIDER_NAME);
        assert!(!settings.is_active);
        assert_eq!(settings.api_style, DEFAULT_API_STYLE);
        assert_eq!(settings.order, DEFAULT_ORDER);
        assert_eq!(settings.kind, RecordKind::Default);
    }

    #[test]
    fn test_new_provider_keeps_supplied_fields() {
        let patch = ProviderSettingsPatch {
            provider_name: Some("OpenAI".to_string()),
            is_active: Some(true),
            order: Some(4),
            ..Default::default()
        };
        let settings = patch.into_new_provider("openai");
        assert_eq!(settings.provider_name, "OpenAI");
        assert!(settings.is_active);
        assert_eq!(settings.order, 4);
    }

    #[test]
    fn test_patch_distinguishes_null_from_missing() {
        let patch: ProviderSettingsPatch =
            serde_json::from_str(r#"{"logo": null, "endpoint": "https://x.example.com"}"#)
                .unwrap();
        assert_eq!(patch.logo, Some(None));
        assert_eq!(
            patch.endpoint,
            Some(Some("https://x.example.com".to_string()))
        );
        assert_eq!(patch.apikey, None);

        let settings = patch.into_new_provider("x");
        assert_eq!(settings.logo, None);
        assert_eq!(settings.endpoint.as_deref(), Some("https://x.example.com"));
    }

    #[test]
    fn test_custom_provider_is_active_and_custom() {
        let input = CustomProviderInput {
            provider: "gw".to_string(),
            provider_name: "Gateway".to_string(),
            endpoint: Some("https://gw.example.com/v1".to_string()),
            api_style: "openai".to_string(),
            apikey: Some("sk-test".to_string()),
        };
        let settings = input.into_settings();
        assert!(settings.is_active);
        assert_eq!(settings.kind, RecordKind::Custom);
    }

    #[test]
    fn test_summary_json_has_no_credentials() {
        let summary = ProviderSummary {
            provider: "openai".to_string(),
            provider_name: "OpenAI".to_string(),
            is_active: true,
            api_style: "openai".to_string(),
            logo: None,
            order: 1,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("apikey").is_none());
        assert!(json.get("endpoint").is_none());
        assert_eq!(json["providerName"], "OpenAI");
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn test_model_kind_serializes_as_type() {
        let model = CustomModelInput {
            name: "qwen-max".to_string(),
            display_name: "Qwen Max".to_string(),
            max_tokens: Some(8192),
            support_vision: false,
            selected: true,
            provider_id: "qwen".to_string(),
            provider_name: "Qwen".to_string(),
        }
        .into_model(DEFAULT_ORDER);
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["type"], "custom");
        assert_eq!(json["providerId"], "qwen");
        assert_eq!(json["maxTokens"], 8192);
    }

    #[test]
    fn test_available_model_flattens_model() {
        let available = AvailableModel {
            model: Model {
                name: "gpt-4o".to_string(),
                provider_id: "openai".to_string(),
                provider_name: "OpenAI".to_string(),
                display_name: "GPT-4o".to_string(),
                max_tokens: None,
                support_vision: true,
                selected: true,
                order: 1,
                kind: RecordKind::Default,
            },
            provider_logo: String::new(),
        };
        let json = serde_json::to_value(&available).unwrap();
        assert_eq!(json["name"], "gpt-4o");
        assert_eq!(json["providerLogo"], "");
        assert!(json.get("model").is_none());
    }

    #[test]
    fn test_action_result_serialization() {
        let ok = serde_json::to_string(&ActionResult::success()).unwrap();
        assert_eq!(ok, r#"{"status":"success"}"#);

        let fail = ActionResult::fail(FailureReason::ModelAlreadyExists, "en");
        let json = serde_json::to_value(&fail).unwrap();
        assert_eq!(json["status"], "fail");
        assert!(json["message"].is_string());
        assert!(!fail.is_success());
    }

    #[test]
    fn test_record_kind_from_str() {
        assert_eq!(RecordKind::from("custom"), RecordKind::Custom);
        assert_eq!(RecordKind::from("default"), RecordKind::Default);
        assert_eq!(RecordKind::from("anything"), RecordKind::Default);
        assert_eq!(RecordKind::Custom.to_string(), "custom");
    }
}
