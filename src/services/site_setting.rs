use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{apply_settings_patch, SettingsPatch, SiteSetting};
use crate::utils::time::current_timestamp_seconds;
use serde_json::{Map, Value};
use sqlx::SqliteConnection;

pub struct SiteSettingService<'a> {
    db: &'a Database,
}

impl<'a> SiteSettingService<'a> {
    pub fn new(db: &'a Database) -> Self {
        SiteSettingService { db }
    }

    pub async fn list(&self) -> AppResult<Vec<SiteSetting>> {
        let mut settings = sqlx::query_as::<_, SiteSetting>(
            r#"
            SELECT id, section_key, content AS content_str, created_at, updated_at
            FROM site_settings
            ORDER BY section_key ASC
            "#,
        )
        .fetch_all(&self.db.pool)
        .await?;

        for setting in &mut settings {
            setting.parse_content();
        }

        Ok(settings)
    }

    pub async fn get_by_key(&self, section_key: &str) -> AppResult<Option<SiteSetting>> {
        let mut conn = self.db.pool.acquire().await?;
        find_by_key(&mut *conn, section_key).await
    }

    /// Stored field map for a section, `None` when the section was never saved.
    pub async fn get_content(&self, section_key: &str) -> AppResult<Option<Map<String, Value>>> {
        Ok(self
            .get_by_key(section_key)
            .await?
            .map(|setting| setting.content))
    }

    /// Merges `patch` into the section's stored fields, creating the section
    /// row on first save.
    pub async fn patch(&self, section_key: &str, patch: SettingsPatch) -> AppResult<SiteSetting> {
        let now = current_timestamp_seconds();
        let mut tx = self.db.pool.begin().await?;

        let mut content = find_by_key(&mut *tx, section_key)
            .await?
            .map(|setting| setting.content)
            .unwrap_or_default();
        apply_settings_patch(&mut content, patch);

        let content_str = serde_json::to_string(&content)
            .map_err(|e| AppError::InternalServerError(format!("Failed to encode content: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO site_settings (id, section_key, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(section_key) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(section_key)
        .bind(&content_str)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let saved = find_by_key(&mut *tx, section_key).await?;
        tx.commit().await?;

        saved.ok_or_else(|| AppError::InternalServerError("Failed to save section".to_string()))
    }
}

async fn find_by_key(
    conn: &mut SqliteConnection,
    section_key: &str,
) -> AppResult<Option<SiteSetting>> {
    let setting = sqlx::query_as::<_, SiteSetting>(
        r#"
        SELECT id, section_key, content AS content_str, created_at, updated_at
        FROM site_settings
        WHERE section_key = $1
        "#,
    )
    .bind(section_key)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(setting.map(|mut setting| {
        setting.parse_content();
        setting
    }))
}
