//! Service offerings shown in the public "Services" section.

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Service, ServicePatch};
use crate::utils::time::current_timestamp_seconds;

const SERVICE_COLUMNS: &str =
    "id, title, description, price, icon, sort_order, is_active, created_at, updated_at";

pub struct CatalogService<'a> {
    db: &'a Database,
}

impl<'a> CatalogService<'a> {
    pub fn new(db: &'a Database) -> Self {
        CatalogService { db }
    }

    pub async fn list_active(&self) -> AppResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(&format!(
            "SELECT {} FROM services WHERE is_active = 1 ORDER BY sort_order ASC, rowid ASC",
            SERVICE_COLUMNS
        ))
        .fetch_all(&self.db.pool)
        .await?;

        Ok(services)
    }

    pub async fn list_all(&self) -> AppResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(&format!(
            "SELECT {} FROM services ORDER BY sort_order ASC, rowid ASC",
            SERVICE_COLUMNS
        ))
        .fetch_all(&self.db.pool)
        .await?;

        Ok(services)
    }

    pub async fn get_service_by_id(&self, id: &str) -> AppResult<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(&format!(
            "SELECT {} FROM services WHERE id = $1",
            SERVICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(service)
    }

    /// Appends a placeholder service at the end of the list.
    pub async fn create_service(&self) -> AppResult<Service> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = current_timestamp_seconds();

        let mut tx = self.db.pool.begin().await?;

        let sort_order: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services")
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO services (id, title, description, price, icon, sort_order, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&id)
        .bind("New Service")
        .bind("Description")
        .bind("Starting ₹0")
        .bind("Sparkles")
        .bind(sort_order)
        .bind(true)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.require(&id).await
    }

    /// Writes only the fields present in `patch`.
    pub async fn update_service(&self, id: &str, patch: &ServicePatch) -> AppResult<Service> {
        if patch.is_empty() {
            return self.require(id).await;
        }

        let result = sqlx::query(
            r#"
            UPDATE services
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                price = COALESCE($3, price),
                icon = COALESCE($4, icon),
                is_active = COALESCE($5, is_active),
                updated_at = $6
            WHERE id = $7
            "#,
        )
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.price)
        .bind(&patch.icon)
        .bind(patch.is_active)
        .bind(current_timestamp_seconds())
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Service not found".to_string()));
        }

        self.require(id).await
    }

    pub async fn toggle_service(&self, id: &str) -> AppResult<Service> {
        let result = sqlx::query(
            "UPDATE services SET is_active = NOT is_active, updated_at = $1 WHERE id = $2",
        )
        .bind(current_timestamp_seconds())
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Service not found".to_string()));
        }

        self.require(id).await
    }

    pub async fn delete_service(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.db.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Service not found".to_string()));
        }

        Ok(())
    }

    async fn require(&self, id: &str) -> AppResult<Service> {
        self.get_service_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
    }
}
