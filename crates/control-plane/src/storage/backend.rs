// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// StorageBackend works with either PostgreSQL (production) or in-memory
// (dev mode and tests) storage. Both variants expose the same method set.

use anyhow::Result;
use std::sync::Arc;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Run schema migrations. No-op for the in-memory backend.
    pub async fn migrate(&self) -> Result<()> {
        match self {
            Self::Postgres(db) => db.migrate().await,
            Self::InMemory(_) => Ok(()),
        }
    }

    // ============================================
    // Providers
    // ============================================

    pub async fn get_provider(&self, provider: &str) -> Result<Option<ProviderRow>> {
        match self {
            Self::Postgres(db) => db.get_provider(provider).await,
            Self::InMemory(db) => db.get_provider(provider).await,
        }
    }

    pub async fn create_provider(&self, input: CreateProviderRow) -> Result<ProviderRow> {
        match self {
            Self::Postgres(db) => db.create_provider(input).await,
            Self::InMemory(db) => db.create_provider(input).await,
        }
    }

    pub async fn update_provider(
        &self,
        provider: &str,
        input: UpdateProviderRow,
    ) -> Result<Option<ProviderRow>> {
        match self {
            Self::Postgres(db) => db.update_provider(provider, input).await,
            Self::InMemory(db) => db.update_provider(provider, input).await,
        }
    }

    pub async fn list_provider_summaries(&self) -> Result<Vec<ProviderSummaryRow>> {
        match self {
            Self::Postgres(db) => db.list_provider_summaries().await,
            Self::InMemory(db) => db.list_provider_summaries().await,
        }
    }

    pub async fn list_providers(&self) -> Result<Vec<ProviderRow>> {
        match self {
            Self::Postgres(db) => db.list_providers().await,
            Self::InMemory(db) => db.list_providers().await,
        }
    }

    pub async fn list_active_providers(&self) -> Result<Vec<ProviderSummaryRow>> {
        match self {
            Self::Postgres(db) => db.list_active_providers().await,
            Self::InMemory(db) => db.list_active_providers().await,
        }
    }

    pub async fn update_provider_order(&self, provider: &str, sort_order: i32) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.update_provider_order(provider, sort_order).await,
            Self::InMemory(db) => db.update_provider_order(provider, sort_order).await,
        }
    }

    pub async fn delete_provider(&self, provider: &str) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_provider(provider).await,
            Self::InMemory(db) => db.delete_provider(provider).await,
        }
    }

    // ============================================
    // Models
    // ============================================

    pub async fn list_models(&self) -> Result<Vec<ModelRow>> {
        match self {
            Self::Postgres(db) => db.list_models().await,
            Self::InMemory(db) => db.list_models().await,
        }
    }

    pub async fn list_models_for_provider(&self, provider_id: &str) -> Result<Vec<ModelRow>> {
        match self {
            Self::Postgres(db) => db.list_models_for_provider(provider_id).await,
            Self::InMemory(db) => db.list_models_for_provider(provider_id).await,
        }
    }

    pub async fn list_available_models(&self) -> Result<Vec<AvailableModelRow>> {
        match self {
            Self::Postgres(db) => db.list_available_models().await,
            Self::InMemory(db) => db.list_available_models().await,
        }
    }

    pub async fn get_model(&self, provider_id: &str, name: &str) -> Result<Option<ModelRow>> {
        match self {
            Self::Postgres(db) => db.get_model(provider_id, name).await,
            Self::InMemory(db) => db.get_model(provider_id, name).await,
        }
    }

    pub async fn create_model(&self, input: CreateModelRow) -> Result<ModelRow> {
        match self {
            Self::Postgres(db) => db.create_model(input).await,
            Self::InMemory(db) => db.create_model(input).await,
        }
    }

    pub async fn replace_model(
        &self,
        provider_id: &str,
        name: &str,
        input: ReplaceModelRow,
    ) -> Result<Option<ModelRow>> {
        match self {
            Self::Postgres(db) => db.replace_model(provider_id, name, input).await,
            Self::InMemory(db) => db.replace_model(provider_id, name, input).await,
        }
    }

    pub async fn set_model_selected(&self, name: &str, selected: bool) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.set_model_selected(name, selected).await,
            Self::InMemory(db) => db.set_model_selected(name, selected).await,
        }
    }

    pub async fn update_model_order(
        &self,
        provider_id: &str,
        name: &str,
        sort_order: i32,
    ) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.update_model_order(provider_id, name, sort_order).await,
            Self::InMemory(db) => db.update_model_order(provider_id, name, sort_order).await,
        }
    }

    pub async fn delete_model(&self, name: &str) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_model(name).await,
            Self::InMemory(db) => db.delete_model(name).await,
        }
    }
}
