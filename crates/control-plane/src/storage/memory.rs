// In-memory storage implementation for dev mode and tests
// Decision: Use parking_lot for thread-safe access
// Decision: Tables are Vecs so the natural order is insertion order, and
//           sorting by "order" is stable like the Postgres ORDER BY on ties
//
// This implementation mirrors the Database API, allowing the control-plane to
// run without a database for development.

use anyhow::{bail, Result};
use parking_lot::RwLock;

use super::models::*;

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    providers: RwLock<Vec<ProviderRow>>,
    models: RwLock<Vec<ModelRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================
    // Providers
    // ============================================

    pub async fn get_provider(&self, provider: &str) -> Result<Option<ProviderRow>> {
        Ok(self
            .providers
            .read()
            .iter()
            .find(|p| p.provider == provider)
            .cloned())
    }

    pub async fn create_provider(&self, input: CreateProviderRow) -> Result<ProviderRow> {
        let mut providers = self.providers.write();
        if providers.iter().any(|p| p.provider == input.provider) {
            bail!(
                "duplicate key value violates unique constraint: provider={}",
                input.provider
            );
        }
        let row = ProviderRow {
            provider: input.provider,
            provider_name: input.provider_name,
            is_active: input.is_active,
            api_style: input.api_style,
            logo: input.logo,
            endpoint: input.endpoint,
            apikey: input.apikey,
            sort_order: input.sort_order,
            kind: input.kind,
        };
        providers.push(row.clone());
        Ok(row)
    }

    pub async fn update_provider(
        &self,
        provider: &str,
        input: UpdateProviderRow,
    ) -> Result<Option<ProviderRow>> {
        let mut providers = self.providers.write();
        if let Some(row) = providers.iter_mut().find(|p| p.provider == provider) {
            if let Some(provider_name) = input.provider_name {
                row.provider_name = provider_name;
            }
            if let Some(is_active) = input.is_active {
                row.is_active = is_active;
            }
            if let Some(api_style) = input.api_style {
                row.api_style = api_style;
            }
            if let Some(logo) = input.logo {
                row.logo = logo;
            }
            if let Some(endpoint) = input.endpoint {
                row.endpoint = endpoint;
            }
            if let Some(apikey) = input.apikey {
                row.apikey = apikey;
            }
            if let Some(sort_order) = input.sort_order {
                row.sort_order = sort_order;
            }
            return Ok(Some(row.clone()));
        }
        Ok(None)
    }

    pub async fn list_provider_summaries(&self) -> Result<Vec<ProviderSummaryRow>> {
        Ok(self
            .providers
            .read()
            .iter()
            .map(ProviderSummaryRow::from)
            .collect())
    }

    pub async fn list_providers(&self) -> Result<Vec<ProviderRow>> {
        let mut result = self.providers.read().clone();
        result.sort_by_key(|p| p.sort_order);
        Ok(result)
    }

    pub async fn list_active_providers(&self) -> Result<Vec<ProviderSummaryRow>> {
        let mut result: Vec<_> = self
            .providers
            .read()
            .iter()
            .filter(|p| p.is_active)
            .map(ProviderSummaryRow::from)
            .collect();
        result.sort_by_key(|p| p.sort_order);
        Ok(result)
    }

    pub async fn update_provider_order(&self, provider: &str, sort_order: i32) -> Result<bool> {
        let mut providers = self.providers.write();
        match providers.iter_mut().find(|p| p.provider == provider) {
            Some(row) => {
                row.sort_order = sort_order;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a provider together with its models
    pub async fn delete_provider(&self, provider: &str) -> Result<bool> {
        // Lock order: providers before models, same as list_available_models
        let mut providers = self.providers.write();
        self.models.write().retain(|m| m.provider_id != provider);
        let before = providers.len();
        providers.retain(|p| p.provider != provider);
        Ok(providers.len() < before)
    }

    // ============================================
    // Models
    // ============================================

    pub async fn list_models(&self) -> Result<Vec<ModelRow>> {
        Ok(self.models.read().clone())
    }

    pub async fn list_models_for_provider(&self, provider_id: &str) -> Result<Vec<ModelRow>> {
        let mut result: Vec<_> = self
            .models
            .read()
            .iter()
            .filter(|m| m.provider_id == provider_id)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.sort_order);
        Ok(result)
    }

    pub async fn list_available_models(&self) -> Result<Vec<AvailableModelRow>> {
        let providers = self.providers.read();
        let models = self.models.read();

        let mut joined: Vec<(i32, AvailableModelRow)> = providers
            .iter()
            .filter(|p| p.is_active)
            .flat_map(|provider| {
                models
                    .iter()
                    .filter(move |m| m.selected && m.provider_id == provider.provider)
                    .map(move |model| {
                        (
                            provider.sort_order,
                            AvailableModelRow {
                                name: model.name.clone(),
                                provider_id: model.provider_id.clone(),
                                provider_name: provider.provider_name.clone(),
                                display_name: model.display_name.clone(),
                                max_tokens: model.max_tokens,
                                support_vision: model.support_vision,
                                selected: model.selected,
                                sort_order: model.sort_order,
                                kind: model.kind.clone(),
                                provider_logo: provider.logo.clone().unwrap_or_default(),
                            },
                        )
                    })
            })
            .collect();

        joined.sort_by_key(|(provider_order, model)| (*provider_order, model.sort_order));
        Ok(joined.into_iter().map(|(_, row)| row).collect())
    }

    pub async fn get_model(&self, provider_id: &str, name: &str) -> Result<Option<ModelRow>> {
        Ok(self
            .models
            .read()
            .iter()
            .find(|m| m.provider_id == provider_id && m.name == name)
            .cloned())
    }

    pub async fn create_model(&self, input: CreateModelRow) -> Result<ModelRow> {
        let mut models = self.models.write();
        if models.iter().any(|m| m.name == input.name) {
            bail!(
                "duplicate key value violates unique constraint: name={}",
                input.name
            );
        }
        let row = ModelRow {
            name: input.name,
            provider_id: input.provider_id,
            provider_name: input.provider_name,
            display_name: input.display_name,
            max_tokens: input.max_tokens,
            support_vision: input.support_vision,
            selected: input.selected,
            sort_order: input.sort_order,
            kind: input.kind,
        };
        models.push(row.clone());
        Ok(row)
    }

    /// Replace all fields of the model keyed by (provider_id, name)
    pub async fn replace_model(
        &self,
        provider_id: &str,
        name: &str,
        input: ReplaceModelRow,
    ) -> Result<Option<ModelRow>> {
        let mut models = self.models.write();

        let Some(index) = models
            .iter()
            .position(|m| m.provider_id == provider_id && m.name == name)
        else {
            return Ok(None);
        };

        // Renaming onto another model's name would break name uniqueness
        if input.name != name
            && models
                .iter()
                .enumerate()
                .any(|(i, m)| i != index && m.name == input.name)
        {
            bail!(
                "duplicate key value violates unique constraint: name={}",
                input.name
            );
        }

        let row = &mut models[index];
        row.name = input.name;
        row.provider_id = input.provider_id;
        row.provider_name = input.provider_name;
        row.display_name = input.display_name;
        row.max_tokens = input.max_tokens;
        row.support_vision = input.support_vision;
        row.selected = input.selected;
        row.kind = input.kind;
        Ok(Some(row.clone()))
    }

    pub async fn set_model_selected(&self, name: &str, selected: bool) -> Result<bool> {
        let mut models = self.models.write();
        match models.iter_mut().find(|m| m.name == name) {
            Some(row) => {
                row.selected = selected;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn update_model_order(
        &self,
        provider_id: &str,
        name: &str,
        sort_order: i32,
    ) -> Result<bool> {
        let mut models = self.models.write();
        match models
            .iter_mut()
            .find(|m| m.provider_id == provider_id && m.name == name)
        {
            Some(row) => {
                row.sort_order = sort_order;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete_model(&self, name: &str) -> Result<bool> {
        let mut models = self.models.write();
        let before = models.len();
        models.retain(|m| m.name != name);
        Ok(models.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str, sort_order: i32, is_active: bool) -> CreateProviderRow {
        CreateProviderRow {
            provider: id.to_string(),
            provider_name: id.to_uppercase(),
            is_active,
            api_style: "openai".to_string(),
            logo: None,
            endpoint: Some(format!("https://{}.example.com", id)),
            apikey: Some("sk-secret".to_string()),
            sort_order,
            kind: "default".to_string(),
        }
    }

    fn model(name: &str, provider_id: &str, sort_order: i32, selected: bool) -> CreateModelRow {
        CreateModelRow {
            name: name.to_string(),
            provider_id: provider_id.to_string(),
            provider_name: provider_id.to_string(),
            display_name: name.to_string(),
            max_tokens: None,
            support_vision: false,
            selected,
            sort_order,
            kind: "default".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_provider() {
        let db = InMemoryDatabase::new();
        db.create_provider(provider("openai", 1, true)).await.unwrap();

        let fetched = db.get_provider("openai").await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().provider_name, "OPENAI");
        assert!(db.get_provider("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_provider_rejected() {
        let db = InMemoryDatabase::new();
        db.create_provider(provider("openai", 1, true)).await.unwrap();
        assert!(db.create_provider(provider("openai", 2, false)).await.is_err());
        assert_eq!(db.list_providers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_provider_only_touches_supplied_fields() {
        let db = InMemoryDatabase::new();
        db.create_provider(provider("openai", 1, false)).await.unwrap();

        let updated = db
            .update_provider(
                "openai",
                UpdateProviderRow {
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(updated.is_active);
        assert_eq!(updated.provider_name, "OPENAI");
        assert_eq!(updated.apikey.as_deref(), Some("sk-secret"));
        assert!(db
            .update_provider("missing", UpdateProviderRow::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_providers_sorted_stably() {
        let db = InMemoryDatabase::new();
        db.create_provider(provider("b", 2, true)).await.unwrap();
        db.create_provider(provider("a", 1, true)).await.unwrap();
        db.create_provider(provider("c", 2, false)).await.unwrap();

        let ids: Vec<_> = db
            .list_providers()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.provider)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let active: Vec<_> = db
            .list_active_providers()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.provider)
            .collect();
        assert_eq!(active, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_available_models_join_and_order() {
        let db = InMemoryDatabase::new();
        db.create_provider(provider("second", 2, true)).await.unwrap();
        db.create_provider(provider("first", 1, true)).await.unwrap();
        db.create_provider(provider("off", 0, false)).await.unwrap();

        db.create_model(model("s-2", "second", 2, true)).await.unwrap();
        db.create_model(model("s-1", "second", 1, true)).await.unwrap();
        db.create_model(model("f-1", "first", 5, true)).await.unwrap();
        db.create_model(model("f-unselected", "first", 1, false))
            .await
            .unwrap();
        db.create_model(model("off-1", "off", 1, true)).await.unwrap();

        let names: Vec<_> = db
            .list_available_models()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["f-1", "s-1", "s-2"]);
    }

    #[tokio::test]
    async fn test_delete_provider_removes_models() {
        let db = InMemoryDatabase::new();
        db.create_provider(provider("openai", 1, true)).await.unwrap();
        db.create_provider(provider("other", 2, true)).await.unwrap();
        db.create_model(model("gpt", "openai", 1, true)).await.unwrap();
        db.create_model(model("keep", "other", 1, true)).await.unwrap();

        assert!(db.delete_provider("openai").await.unwrap());
        assert!(!db.delete_provider("openai").await.unwrap());

        let names: Vec<_> = db
            .list_models()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["keep"]);
    }

    #[tokio::test]
    async fn test_replace_model_rejects_name_collision() {
        let db = InMemoryDatabase::new();
        db.create_model(model("a", "p", 1, true)).await.unwrap();
        db.create_model(model("b", "p", 2, true)).await.unwrap();

        let result = db
            .replace_model(
                "p",
                "a",
                ReplaceModelRow {
                    name: "b".to_string(),
                    provider_id: "p".to_string(),
                    provider_name: "p".to_string(),
                    display_name: "B".to_string(),
                    max_tokens: None,
                    support_vision: false,
                    selected: true,
                    kind: "custom".to_string(),
                },
            )
            .await;
        assert!(result.is_err());
        assert!(db.get_model("p", "a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_replace_missing_model_is_none_even_on_name_clash() {
        let db = InMemoryDatabase::new();
        db.create_model(model("gpt-x", "openai", 1, true)).await.unwrap();

        // No (openai, gone) row: nothing matches, so the clash is never reached
        let result = db
            .replace_model(
                "openai",
                "gone",
                ReplaceModelRow {
                    name: "gpt-x".to_string(),
                    provider_id: "openai".to_string(),
                    provider_name: "openai".to_string(),
                    display_name: "Clash".to_string(),
                    max_tokens: None,
                    support_vision: false,
                    selected: false,
                    kind: "custom".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());

        let row = db.get_model("openai", "gpt-x").await.unwrap().unwrap();
        assert_eq!(row.display_name, "gpt-x");
        assert!(row.selected);
    }

    #[tokio::test]
    async fn test_model_mutations_report_missing_rows() {
        let db = InMemoryDatabase::new();
        db.create_model(model("gpt", "openai", 1, false)).await.unwrap();

        assert!(db.set_model_selected("gpt", true).await.unwrap());
        assert!(!db.set_model_selected("missing", true).await.unwrap());
        assert!(db.update_model_order("openai", "gpt", 7).await.unwrap());
        assert!(!db.update_model_order("other", "gpt", 7).await.unwrap());

        let row = db.get_model("openai", "gpt").await.unwrap().unwrap();
        assert!(row.selected);
        assert_eq!(row.sort_order, 7);

        assert!(db.delete_model("gpt").await.unwrap());
        assert!(!db.delete_model("gpt").await.unwrap());
    }
}
