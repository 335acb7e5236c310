// LLM provider/model registry service
// Decision: Every operation takes the caller's SessionContext explicitly
// Decision: Business-rule rejections are ActionResult values, not errors
//
// Admin-gated operations check the session before touching storage, so a
// rejected call never reads or writes a row.

use futures::future::join_all;
use llmhub_core::{
    ActionResult, AvailableModel, CustomModelInput, CustomProviderInput, FailureReason, Model,
    ModelOrder, ProviderOrder, ProviderSettings, ProviderSettingsPatch, ProviderSummary,
    RecordKind, RegistryError, Result, SessionContext, DEFAULT_ORDER,
};
use std::sync::Arc;

use crate::storage::{
    AvailableModelRow, CreateModelRow, CreateProviderRow, EncryptionService, ModelRow,
    ProviderRow, ProviderSummaryRow, ReplaceModelRow, StorageBackend, UpdateProviderRow,
};

#[derive(Clone)]
pub struct RegistryService {
    db: StorageBackend,
    encryption: Option<Arc<EncryptionService>>,
}

impl RegistryService {
    pub fn new(db: StorageBackend, encryption: Option<Arc<EncryptionService>>) -> Self {
        Self { db, encryption }
    }

    // ============================================
    // Providers
    // ============================================

    /// Update the provider if it exists, otherwise insert it with defaults.
    /// Only the fields present in `patch` are written on update.
    pub async fn upsert_provider_settings(
        &self,
        session: &SessionContext,
        provider: &str,
        mut patch: ProviderSettingsPatch,
    ) -> Result<()> {
        session.require_admin()?;

        let apikey = patch
            .apikey
            .take()
            .map(|key| self.seal_apikey(key))
            .transpose()?;

        if self.db.get_provider(provider).await?.is_some() {
            let input = UpdateProviderRow {
                provider_name: patch.provider_name,
                is_active: patch.is_active,
                api_style: patch.api_style,
                logo: patch.logo,
                endpoint: patch.endpoint,
                apikey,
                sort_order: patch.order,
            };
            self.db.update_provider(provider, input).await?;
            tracing::info!(provider = %provider, "Updated provider settings");
        } else {
            let mut settings = patch.into_new_provider(provider);
            settings.apikey = apikey.flatten();
            self.db.create_provider(create_provider_row(settings)).await?;
            tracing::info!(provider = %provider, "Inserted provider settings");
        }

        Ok(())
    }

    /// Non-sensitive columns of every provider, in storage order
    pub async fn list_provider_summaries(&self) -> Result<Vec<ProviderSummary>> {
        let rows = self.db.list_provider_summaries().await?;
        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    /// Every column of every provider, ordered by `order`. Admin only.
    pub async fn list_provider_settings(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<ProviderSettings>> {
        session.require_admin()?;

        let rows = self.db.list_providers().await?;
        rows.into_iter()
            .map(|row| self.row_to_settings(row))
            .collect()
    }

    /// Providers with `is_active = true`, ordered by `order`.
    /// Not gated, so credentials are left out.
    pub async fn list_active_providers(&self) -> Result<Vec<ProviderSummary>> {
        let rows = self.db.list_active_providers().await?;
        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    pub async fn add_custom_provider(
        &self,
        session: &SessionContext,
        input: CustomProviderInput,
    ) -> Result<ActionResult> {
        session.require_admin()?;

        if self.db.get_provider(&input.provider).await?.is_some() {
            tracing::debug!(provider = %input.provider, "Custom provider already exists");
            return Ok(ActionResult::fail(
                FailureReason::ProviderAlreadyExists,
                &session.locale,
            ));
        }

        let mut settings = input.into_settings();
        settings.apikey = self.seal_apikey(settings.apikey.take())?;
        let row = self.db.create_provider(create_provider_row(settings)).await?;

        tracing::info!(provider = %row.provider, "Added custom provider");
        Ok(ActionResult::success())
    }

    /// Delete a provider and every model that references it
    pub async fn delete_custom_provider(
        &self,
        session: &SessionContext,
        provider: &str,
    ) -> Result<ActionResult> {
        session.require_admin()?;

        let deleted = self.db.delete_provider(provider).await?;
        tracing::info!(provider = %provider, deleted, "Deleted custom provider");
        Ok(ActionResult::success())
    }

    /// Apply new sort keys to providers.
    ///
    /// Each update is an independent statement and all of them run
    /// concurrently. The batch is not atomic: when one update fails the
    /// others may already be applied. The first error is returned once every
    /// update has settled.
    pub async fn reorder_providers(
        &self,
        session: &SessionContext,
        orders: Vec<ProviderOrder>,
    ) -> Result<()> {
        session.require_admin()?;

        let results = join_all(
            orders
                .iter()
                .map(|item| self.db.update_provider_order(&item.provider_id, item.order)),
        )
        .await;

        settle("provider", results)
    }

    // ============================================
    // Models
    // ============================================

    /// All models, or the models of one provider ordered by `order`
    pub async fn list_models(&self, provider_id: Option<&str>) -> Result<Vec<Model>> {
        let rows = match provider_id {
            Some(provider_id) => self.db.list_models_for_provider(provider_id).await?,
            None => self.db.list_models().await?,
        };
        Ok(rows.into_iter().map(row_to_model).collect())
    }

    /// Selected models of active providers, ordered by provider then model
    pub async fn list_available_models(&self) -> Result<Vec<AvailableModel>> {
        let rows = self.db.list_available_models().await?;
        Ok(rows.into_iter().map(row_to_available).collect())
    }

    pub async fn set_model_selected(&self, model_name: &str, selected: bool) -> Result<()> {
        let updated = self.db.set_model_selected(model_name, selected).await?;
        if !updated {
            tracing::debug!(model = %model_name, "set_model_selected matched no model");
        }
        Ok(())
    }

    pub async fn delete_model(&self, session: &SessionContext, model_name: &str) -> Result<()> {
        session.require_admin()?;

        let deleted = self.db.delete_model(model_name).await?;
        tracing::info!(model = %model_name, deleted, "Deleted model");
        Ok(())
    }

    pub async fn add_custom_model(
        &self,
        session: &SessionContext,
        input: CustomModelInput,
    ) -> Result<ActionResult> {
        if self
            .db
            .get_model(&input.provider_id, &input.name)
            .await?
            .is_some()
        {
            return Ok(ActionResult::fail(
                FailureReason::ModelAlreadyExists,
                &session.locale,
            ));
        }

        if self.db.get_provider(&input.provider_id).await?.is_none() {
            return Ok(ActionResult::fail(
                FailureReason::ProviderNotFound,
                &session.locale,
            ));
        }

        let model = input.into_model(DEFAULT_ORDER);
        self.db
            .create_model(CreateModelRow {
                name: model.name,
                provider_id: model.provider_id,
                provider_name: model.provider_name,
                display_name: model.display_name,
                max_tokens: model.max_tokens,
                support_vision: model.support_vision,
                selected: model.selected,
                sort_order: model.order,
                kind: model.kind.to_string(),
            })
            .await?;

        tracing::info!("Added custom model");
        Ok(ActionResult::success())
    }

    /// Replace the model keyed by (`input.provider_id`, `old_model_name`).
    /// The sort key of the row is kept.
    pub async fn update_custom_model(
        &self,
        session: &SessionContext,
        old_model_name: &str,
        input: CustomModelInput,
    ) -> Result<ActionResult> {
        let provider_id = input.provider_id.clone();
        let model = input.into_model(DEFAULT_ORDER);

        let replaced = self
            .db
            .replace_model(
                &provider_id,
                old_model_name,
                ReplaceModelRow {
                    name: model.name,
                    provider_id: model.provider_id,
                    provider_name: model.provider_name,
                    display_name: model.display_name,
                    max_tokens: model.max_tokens,
                    support_vision: model.support_vision,
                    selected: model.selected,
                    kind: model.kind.to_string(),
                },
            )
            .await?;

        match replaced {
            Some(row) => {
                tracing::info!(model = %row.name, old = %old_model_name, "Updated custom model");
                Ok(ActionResult::success())
            }
            None => Ok(ActionResult::fail(
                FailureReason::ModelNotFound,
                &session.locale,
            )),
        }
    }

    /// Apply new sort keys to models of one provider.
    ///
    /// Same best-effort semantics as [`Self::reorder_providers`].
    pub async fn reorder_models(
        &self,
        session: &SessionContext,
        provider_id: &str,
        orders: Vec<ModelOrder>,
    ) -> Result<()> {
        session.require_admin()?;

        let results = join_all(
            orders
                .iter()
                .map(|item| self.db.update_model_order(provider_id, &item.model_id, item.order)),
        )
        .await;

        settle("model", results)
    }

    // ============================================
    // Helpers
    // ============================================

    fn seal_apikey(&self, apikey: Option<String>) -> Result<Option<String>> {
        match (apikey, &self.encryption) {
            (Some(key), Some(encryption)) => encryption
                .encrypt_string(&key)
                .map(Some)
                .map_err(|e| RegistryError::encryption(e.to_string())),
            (apikey, _) => Ok(apikey),
        }
    }

    fn open_apikey(&self, stored: Option<String>) -> Result<Option<String>> {
        match (stored, &self.encryption) {
            (Some(value), Some(encryption)) => encryption
                .decrypt_string(&value)
                .map(Some)
                .map_err(|e| RegistryError::encryption(e.to_string())),
            (Some(value), None) if EncryptionService::is_encrypted(&value) => Err(
                RegistryError::encryption("stored API key is encrypted but no key is configured"),
            ),
            (stored, None) => Ok(stored),
            (None, Some(_)) => Ok(None),
        }
    }

    fn row_to_settings(&self, row: ProviderRow) -> Result<ProviderSettings> {
        Ok(ProviderSettings {
            apikey: self.open_apikey(row.apikey)?,
            provider: row.provider,
            provider_name: row.provider_name,
            is_active: row.is_active,
            api_style: row.api_style,
            logo: row.logo,
            endpoint: row.endpoint,
            order: row.sort_order,
            kind: RecordKind::from(row.kind.as_str()),
        })
    }
}

/// Wait-all result handling for batch reorders
fn settle(entity: &str, results: Vec<anyhow::Result<bool>>) -> Result<()> {
    let total = results.len();
    let mut applied = 0;
    let mut first_error = None;

    for result in results {
        match result {
            Ok(true) => applied += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(entity, error = %e, "Order update failed");
                first_error.get_or_insert(e);
            }
        }
    }

    tracing::info!(entity, total, applied, "Applied order updates");

    match first_error {
        Some(e) => Err(RegistryError::Storage(e)),
        None => Ok(()),
    }
}

fn create_provider_row(settings: ProviderSettings) -> CreateProviderRow {
    CreateProviderRow {
        provider: settings.provider,
        provider_name: settings.provider_name,
        is_active: settings.is_active,
        api_style: settings.api_style,
        logo: settings.logo,
        endpoint: settings.endpoint,
        apikey: settings.apikey,
        sort_order: settings.order,
        kind: settings.kind.to_string(),
    }
}

fn row_to_summary(row: ProviderSummaryRow) -> ProviderSummary {
    ProviderSummary {
        provider: row.provider,
        provider_name: row.provider_name,
        is_active: row.is_active,
        api_style: row.api_style,
        logo: row.logo,
        order: row.sort_order,
    }
}

fn row_to_model(row: ModelRow) -> Model {
    Model {
        name: row.name,
        provider_id: row.provider_id,
        provider_name: row.provider_name,
        display_name: row.display_name,
        max_tokens: row.max_tokens,
        support_vision: row.support_vision,
        selected: row.selected,
        order: row.sort_order,
        kind: RecordKind::from(row.kind.as_str()),
    }
}

fn row_to_available(row: AvailableModelRow) -> AvailableModel {
    AvailableModel {
        model: Model {
            name: row.name,
            provider_id: row.provider_id,
            provider_name: row.provider_name,
            display_name: row.display_name,
            max_tokens: row.max_tokens,
            support_vision: row.support_vision,
            selected: row.selected,
            order: row.sort_order,
            kind: RecordKind::from(row.kind.as_str()),
        },
        provider_logo: row.provider_logo,
    }
}
