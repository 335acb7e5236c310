// Localized failure messages for registry business-rule rejections
//
// Messages live in gettext catalogs under `locales/<locale>/messages.po`,
// keyed by dot-notation ids. Lookup falls back to the default locale, then
// to the key itself.

use std::collections::HashMap;

use gettext::Catalog;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Locale used when the caller did not ask for a supported one
pub const DEFAULT_LOCALE: &str = "en";

/// Locales with a full message catalog
pub const LOCALES: &[&str] = &["en", "zh"];

const EN_MO: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/en.mo"));
const ZH_MO: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/zh.mo"));

static CATALOGS: Lazy<HashMap<&'static str, Catalog>> = Lazy::new(|| {
    let mut map = HashMap::new();

    match Catalog::parse(EN_MO) {
        Ok(catalog) => {
            map.insert("en", catalog);
        }
        Err(e) => tracing::error!(error = %e, "Failed to parse English message catalog"),
    }

    match Catalog::parse(ZH_MO) {
        Ok(catalog) => {
            map.insert("zh", catalog);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to parse Chinese message catalog"),
    }

    map
});

/// Translate a message id for the given locale.
///
/// Falls back to the default locale, then to the msgid itself.
pub fn t(locale: &str, msgid: &str) -> String {
    if let Some(catalog) = CATALOGS.get(locale) {
        let translated = catalog.gettext(msgid);
        if translated != msgid {
            return translated.to_string();
        }
    }

    if locale != DEFAULT_LOCALE {
        if let Some(catalog) = CATALOGS.get(DEFAULT_LOCALE) {
            let translated = catalog.gettext(msgid);
            if translated != msgid {
                return translated.to_string();
            }
        }
    }

    msgid.to_string()
}

/// Reduce a language tag ("zh-CN", "en_US", "ZH") to a supported locale
pub fn normalize_locale(tag: &str) -> &'static str {
    let primary = tag
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    LOCALES
        .iter()
        .find(|l| **l == primary)
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// Expected business-rule violations reported through `ActionResult`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// A model with the same provider and name is already registered
    ModelAlreadyExists,
    /// The model to update no longer exists
    ModelNotFound,
    /// A provider with the same identifier is already registered
    ProviderAlreadyExists,
    /// The provider referenced by a model does not exist
    ProviderNotFound,
}

impl FailureReason {
    /// Catalog message id
    pub fn key(&self) -> &'static str {
        match self {
            FailureReason::ModelAlreadyExists => "registry.model.already_exists",
            FailureReason::ModelNotFound => "registry.model.not_found",
            FailureReason::ProviderAlreadyExists => "registry.provider.already_exists",
            FailureReason::ProviderNotFound => "registry.provider.not_found",
        }
    }

    /// Message rendered for the given language tag
    pub fn message(&self, locale: &str) -> String {
        t(normalize_locale(locale), self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_REASONS: [FailureReason; 4] = [
        FailureReason::ModelAlreadyExists,
        FailureReason::ModelNotFound,
        FailureReason::ProviderAlreadyExists,
        FailureReason::ProviderNotFound,
    ];

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("zh-CN"), "zh");
        assert_eq!(normalize_locale("ZH"), "zh");
        assert_eq!(normalize_locale("en_US"), "en");
        assert_eq!(normalize_locale("fr"), DEFAULT_LOCALE);
        assert_eq!(normalize_locale(""), DEFAULT_LOCALE);
    }

    #[test]
    fn test_translate_from_catalog() {
        assert_eq!(
            t("en", "registry.model.not_found"),
            "The model has been deleted"
        );
        assert_eq!(t("zh", "registry.model.already_exists"), "已存在相同名称的模型");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        assert_eq!(
            t("de", "registry.provider.not_found"),
            t("en", "registry.provider.not_found")
        );
    }

    #[test]
    fn test_unknown_key_falls_back_to_msgid() {
        assert_eq!(t("zh", "registry.unknown"), "registry.unknown");
    }

    #[test]
    fn test_messages_per_locale() {
        assert_eq!(
            FailureReason::ModelAlreadyExists.message("zh-CN"),
            "已存在相同名称的模型"
        );
        assert_eq!(
            FailureReason::ModelNotFound.message("zh"),
            "该模型已经被删除"
        );
        assert_eq!(
            FailureReason::ProviderAlreadyExists.message("zh"),
            "已存在相同名称的服务商"
        );
        assert_eq!(
            FailureReason::ModelNotFound.message("en"),
            "The model has been deleted"
        );
        // Unsupported locales fall back to English
        assert_eq!(
            FailureReason::ProviderNotFound.message("de"),
            FailureReason::ProviderNotFound.message("en")
        );
    }

    #[test]
    fn test_every_reason_has_a_message_in_every_locale() {
        for reason in ALL_REASONS {
            for locale in LOCALES {
                assert_ne!(reason.message(locale), reason.key(), "{locale} {reason:?}");
            }
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = ALL_REASONS.iter().map(|r| r.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), ALL_REASONS.len());
    }
}
