use crate::db::Database;
use crate::error::AppResult;
use crate::models::User;
use crate::utils::time::current_timestamp_seconds;

pub struct UserService<'a> {
    db: &'a Database,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a Database) -> Self {
        UserService { db }
    }

    pub async fn get_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, last_active_at, updated_at, created_at
            FROM "user"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(result)
    }

    /// User whose credentials are still active. Deactivated accounts lose
    /// their sessions immediately instead of when the token expires.
    pub async fn get_active_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.role, u.last_active_at, u.updated_at, u.created_at
            FROM "user" u
            JOIN auth a ON a.id = u.id
            WHERE u.id = $1 AND a.active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(result)
    }

    pub async fn count_users(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user""#)
            .fetch_one(&self.db.pool)
            .await?;

        Ok(count)
    }

    pub async fn update_user_last_active(&self, id: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE "user"
            SET last_active_at = $1
            WHERE id = $2
            "#,
        )
        .bind(current_timestamp_seconds())
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        Ok(())
    }
}
