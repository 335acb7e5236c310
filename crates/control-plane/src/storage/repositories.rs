// Repository layer for database operations
// Decision: Runtime-bound queries (no compile-time DATABASE_URL needed)
// Decision: Each method is a single statement except provider deletion

use anyhow::Result;
use sqlx::PgPool;

use super::models::*;

const PROVIDER_COLUMNS: &str = r#"provider, provider_name, is_active, api_style, logo, endpoint, apikey, "order", "type""#;
const PROVIDER_SUMMARY_COLUMNS: &str =
    r#"provider, provider_name, is_active, api_style, logo, "order""#;
const MODEL_COLUMNS: &str = r#"name, provider_id, provider_name, display_name, max_tokens, support_vision, selected, "order", "type""#;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Apply embedded migrations from `migrations/`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Providers
    // ============================================

    pub async fn get_provider(&self, provider: &str) -> Result<Option<ProviderRow>> {
        let row = sqlx::query_as::<_, ProviderRow>(&format!(
            "SELECT {PROVIDER_COLUMNS} FROM llm_settings WHERE provider = $1 LIMIT 1"
        ))
        .bind(provider)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create_provider(&self, input: CreateProviderRow) -> Result<ProviderRow> {
        let row = sqlx::query_as::<_, ProviderRow>(&format!(
            r#"
            INSERT INTO llm_settings (provider, provider_name, is_active, api_style, logo, endpoint, apikey, "order", "type")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PROVIDER_COLUMNS}
            "#
        ))
        .bind(&input.provider)
        .bind(&input.provider_name)
        .bind(input.is_active)
        .bind(&input.api_style)
        .bind(&input.logo)
        .bind(&input.endpoint)
        .bind(&input.apikey)
        .bind(input.sort_order)
        .bind(&input.kind)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_provider(
        &self,
        provider: &str,
        input: UpdateProviderRow,
    ) -> Result<Option<ProviderRow>> {
        let row = sqlx::query_as::<_, ProviderRow>(&format!(
            r#"
            UPDATE llm_settings
            SET
                provider_name = COALESCE($2, provider_name),
                is_active = COALESCE($3, is_active),
                api_style = COALESCE($4, api_style),
                logo = CASE WHEN $5 THEN $6 ELSE logo END,
                endpoint = CASE WHEN $7 THEN $8 ELSE endpoint END,
                apikey = CASE WHEN $9 THEN $10 ELSE apikey END,
                "order" = COALESCE($11, "order")
            WHERE provider = $1
            RETURNING {PROVIDER_COLUMNS}
            "#
        ))
        .bind(provider)
        .bind(&input.provider_name)
        .bind(input.is_active)
        .bind(&input.api_style)
        .bind(input.logo.is_some())
        .bind(input.logo.flatten())
        .bind(input.endpoint.is_some())
        .bind(input.endpoint.flatten())
        .bind(input.apikey.is_some())
        .bind(input.apikey.flatten())
        .bind(input.sort_order)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_provider_summaries(&self) -> Result<Vec<ProviderSummaryRow>> {
        let rows = sqlx::query_as::<_, ProviderSummaryRow>(&format!(
            "SELECT {PROVIDER_SUMMARY_COLUMNS} FROM llm_settings"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_providers(&self) -> Result<Vec<ProviderRow>> {
        let rows = sqlx::query_as::<_, ProviderRow>(&format!(
            r#"SELECT {PROVIDER_COLUMNS} FROM llm_settings ORDER BY "order" ASC"#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_active_providers(&self) -> Result<Vec<ProviderSummaryRow>> {
        let rows = sqlx::query_as::<_, ProviderSummaryRow>(&format!(
            r#"SELECT {PROVIDER_SUMMARY_COLUMNS} FROM llm_settings WHERE is_active = TRUE ORDER BY "order" ASC"#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_provider_order(&self, provider: &str, sort_order: i32) -> Result<bool> {
        let result = sqlx::query(r#"UPDATE llm_settings SET "order" = $2 WHERE provider = $1"#)
            .bind(provider)
            .bind(sort_order)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a provider together with its models
    pub async fn delete_provider(&self, provider: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM models WHERE provider_id = $1")
            .bind(provider)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM llm_settings WHERE provider = $1")
            .bind(provider)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Models
    // ============================================

    pub async fn list_models(&self) -> Result<Vec<ModelRow>> {
        let rows = sqlx::query_as::<_, ModelRow>(&format!("SELECT {MODEL_COLUMNS} FROM models"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn list_models_for_provider(&self, provider_id: &str) -> Result<Vec<ModelRow>> {
        let rows = sqlx::query_as::<_, ModelRow>(&format!(
            r#"SELECT {MODEL_COLUMNS} FROM models WHERE provider_id = $1 ORDER BY "order" ASC"#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_available_models(&self) -> Result<Vec<AvailableModelRow>> {
        let rows = sqlx::query_as::<_, AvailableModelRow>(
            r#"
            SELECT m.name, m.provider_id, p.provider_name, m.display_name, m.max_tokens,
                   m.support_vision, m.selected, m."order", m."type",
                   COALESCE(p.logo, '') AS provider_logo
            FROM llm_settings p
            INNER JOIN models m ON p.provider = m.provider_id
            WHERE p.is_active = TRUE AND m.selected = TRUE
            ORDER BY p."order" ASC, m."order" ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_model(&self, provider_id: &str, name: &str) -> Result<Option<ModelRow>> {
        let row = sqlx::query_as::<_, ModelRow>(&format!(
            "SELECT {MODEL_COLUMNS} FROM models WHERE provider_id = $1 AND name = $2"
        ))
        .bind(provider_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn create_model(&self, input: CreateModelRow) -> Result<ModelRow> {
        let row = sqlx::query_as::<_, ModelRow>(&format!(
            r#"
            INSERT INTO models (name, provider_id, provider_name, display_name, max_tokens, support_vision, selected, "order", "type")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {MODEL_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.provider_id)
        .bind(&input.provider_name)
        .bind(&input.display_name)
        .bind(input.max_tokens)
        .bind(input.support_vision)
        .bind(input.selected)
        .bind(input.sort_order)
        .bind(&input.kind)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Replace all fields of the model keyed by (provider_id, name)
    pub async fn replace_model(
        &self,
        provider_id: &str,
        name: &str,
        input: ReplaceModelRow,
    ) -> Result<Option<ModelRow>> {
        let row = sqlx::query_as::<_, ModelRow>(&format!(
            r#"
            UPDATE models
            SET
                name = $3,
                provider_id = $4,
                provider_name = $5,
                display_name = $6,
                max_tokens = $7,
                support_vision = $8,
                selected = $9,
                "type" = $10
            WHERE provider_id = $1 AND name = $2
            RETURNING {MODEL_COLUMNS}
            "#
        ))
        .bind(provider_id)
        .bind(name)
        .bind(&input.name)
        .bind(&input.provider_id)
        .bind(&input.provider_name)
        .bind(&input.display_name)
        .bind(input.max_tokens)
        .bind(input.support_vision)
        .bind(input.selected)
        .bind(&input.kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn set_model_selected(&self, name: &str, selected: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE models SET selected = $2 WHERE name = $1")
            .bind(name)
            .bind(selected)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_model_order(
        &self,
        provider_id: &str,
        name: &str,
        sort_order: i32,
    ) -> Result<bool> {
        let result =
            sqlx::query(r#"UPDATE models SET "order" = $3 WHERE provider_id = $1 AND name = $2"#)
                .bind(provider_id)
                .bind(name)
                .bind(sort_order)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_model(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM models WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
