use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{GalleryItem, GalleryItemPatch};
use crate::utils::time::current_timestamp_seconds;

const GALLERY_COLUMNS: &str =
    "id, title, category, image_url, sort_order, is_active, created_at, updated_at";

pub struct GalleryService<'a> {
    db: &'a Database,
}

impl<'a> GalleryService<'a> {
    pub fn new(db: &'a Database) -> Self {
        GalleryService { db }
    }

    pub async fn list_active(&self) -> AppResult<Vec<GalleryItem>> {
        let items = sqlx::query_as::<_, GalleryItem>(&format!(
            "SELECT {} FROM gallery_items WHERE is_active = 1 ORDER BY sort_order ASC, rowid ASC",
            GALLERY_COLUMNS
        ))
        .fetch_all(&self.db.pool)
        .await?;

        Ok(items)
    }

    pub async fn list_all(&self) -> AppResult<Vec<GalleryItem>> {
        let items = sqlx::query_as::<_, GalleryItem>(&format!(
            "SELECT {} FROM gallery_items ORDER BY sort_order ASC, rowid ASC",
            GALLERY_COLUMNS
        ))
        .fetch_all(&self.db.pool)
        .await?;

        Ok(items)
    }

    pub async fn get_item_by_id(&self, id: &str) -> AppResult<Option<GalleryItem>> {
        let item = sqlx::query_as::<_, GalleryItem>(&format!(
            "SELECT {} FROM gallery_items WHERE id = $1",
            GALLERY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(item)
    }

    pub async fn create_item(&self) -> AppResult<GalleryItem> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = current_timestamp_seconds();

        let mut tx = self.db.pool.begin().await?;

        let sort_order: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gallery_items")
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO gallery_items (id, title, category, image_url, sort_order, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&id)
        .bind("New Image")
        .bind("Bridal")
        .bind("/placeholder.svg")
        .bind(sort_order)
        .bind(true)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.require(&id).await
    }

    pub async fn update_item(&self, id: &str, patch: &GalleryItemPatch) -> AppResult<GalleryItem> {
        if patch.is_empty() {
            return self.require(id).await;
        }

        let result = sqlx::query(
            r#"
            UPDATE gallery_items
            SET title = COALESCE($1, title),
                category = COALESCE($2, category),
                image_url = COALESCE($3, image_url),
                is_active = COALESCE($4, is_active),
                updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&patch.title)
        .bind(&patch.category)
        .bind(&patch.image_url)
        .bind(patch.is_active)
        .bind(current_timestamp_seconds())
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Gallery item not found".to_string()));
        }

        self.require(id).await
    }

    pub async fn toggle_item(&self, id: &str) -> AppResult<GalleryItem> {
        let result = sqlx::query(
            "UPDATE gallery_items SET is_active = NOT is_active, updated_at = $1 WHERE id = $2",
        )
        .bind(current_timestamp_seconds())
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Gallery item not found".to_string()));
        }

        self.require(id).await
    }

    pub async fn delete_item(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM gallery_items WHERE id = $1")
            .bind(id)
            .execute(&self.db.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Gallery item not found".to_string()));
        }

        Ok(())
    }

    pub async fn require(&self, id: &str) -> AppResult<GalleryItem> {
        self.get_item_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Gallery item not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_image_patch_keeps_metadata() {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        let gallery = GalleryService::new(&db);

        let item = gallery
            .update_item(
                "seed-gallery-2",
                &GalleryItemPatch::image("/uploads/gallery/1-abcdef01.jpg".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(item.image_url, "/uploads/gallery/1-abcdef01.jpg");
        assert_eq!(item.title, "Glamorous Party Look");
        assert_eq!(item.category, "Party");
    }

    #[tokio::test]
    async fn test_create_then_delete() {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        let gallery = GalleryService::new(&db);

        let item = gallery.create_item().await.unwrap();
        assert_eq!(item.image_url, "/placeholder.svg");
        assert_eq!(item.sort_order, 6);
        assert_eq!(gallery.list_active().await.unwrap().len(), 7);

        gallery.delete_item(&item.id).await.unwrap();
        assert_eq!(gallery.list_all().await.unwrap().len(), 6);
    }
}
