use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Testimonial, TestimonialPatch, DEFAULT_RATING};
use crate::utils::time::current_timestamp_seconds;

const TESTIMONIAL_COLUMNS: &str =
    "id, name, role, text, rating, sort_order, is_active, created_at, updated_at";

pub struct TestimonialService<'a> {
    db: &'a Database,
}

impl<'a> TestimonialService<'a> {
    pub fn new(db: &'a Database) -> Self {
        TestimonialService { db }
    }

    pub async fn list_active(&self) -> AppResult<Vec<Testimonial>> {
        let testimonials = sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {} FROM testimonials WHERE is_active = 1 ORDER BY sort_order ASC, rowid ASC",
            TESTIMONIAL_COLUMNS
        ))
        .fetch_all(&self.db.pool)
        .await?;

        Ok(testimonials)
    }

    pub async fn list_all(&self) -> AppResult<Vec<Testimonial>> {
        let testimonials = sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {} FROM testimonials ORDER BY sort_order ASC, rowid ASC",
            TESTIMONIAL_COLUMNS
        ))
        .fetch_all(&self.db.pool)
        .await?;

        Ok(testimonials)
    }

    pub async fn get_testimonial_by_id(&self, id: &str) -> AppResult<Option<Testimonial>> {
        let testimonial = sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {} FROM testimonials WHERE id = $1",
            TESTIMONIAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(testimonial)
    }

    pub async fn create_testimonial(&self) -> AppResult<Testimonial> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = current_timestamp_seconds();

        let mut tx = self.db.pool.begin().await?;

        let sort_order: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM testimonials")
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO testimonials (id, name, role, text, rating, sort_order, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&id)
        .bind("New Client")
        .bind("Client")
        .bind("Great service!")
        .bind(DEFAULT_RATING)
        .bind(sort_order)
        .bind(true)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.require(&id).await
    }

    pub async fn update_testimonial(
        &self,
        id: &str,
        patch: &TestimonialPatch,
    ) -> AppResult<Testimonial> {
        if patch.is_empty() {
            return self.require(id).await;
        }

        let result = sqlx::query(
            r#"
            UPDATE testimonials
            SET name = COALESCE($1, name),
                role = COALESCE($2, role),
                text = COALESCE($3, text),
                rating = COALESCE($4, rating),
                is_active = COALESCE($5, is_active),
                updated_at = $6
            WHERE id = $7
            "#,
        )
        .bind(&patch.name)
        .bind(&patch.role)
        .bind(&patch.text)
        .bind(patch.rating.as_ref().map(|r| r.value()))
        .bind(patch.is_active)
        .bind(current_timestamp_seconds())
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Testimonial not found".to_string()));
        }

        self.require(id).await
    }

    pub async fn toggle_testimonial(&self, id: &str) -> AppResult<Testimonial> {
        let result = sqlx::query(
            "UPDATE testimonials SET is_active = NOT is_active, updated_at = $1 WHERE id = $2",
        )
        .bind(current_timestamp_seconds())
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Testimonial not found".to_string()));
        }

        self.require(id).await
    }

    pub async fn delete_testimonial(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.db.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Testimonial not found".to_string()));
        }

        Ok(())
    }

    async fn require(&self, id: &str) -> AppResult<Testimonial> {
        self.get_testimonial_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Testimonial not found".to_string()))
    }
}
