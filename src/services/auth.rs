use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Auth, User, ADMIN_ROLE};
use crate::services::user::UserService;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::time::current_timestamp_seconds;

pub struct AuthService<'a> {
    db: &'a Database,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Database) -> Self {
        AuthService { db }
    }

    pub async fn get_auth_by_email(&self, email: &str) -> AppResult<Option<Auth>> {
        let result = sqlx::query_as::<_, Auth>(
            r#"
            SELECT id, email, password, active, created_at, updated_at
            FROM auth
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db.pool)
        .await?;

        Ok(result)
    }

    /// User id for valid credentials, `None` for an unknown email or a wrong
    /// password.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<String>> {
        let Some(auth) = self.get_auth_by_email(email).await? else {
            return Ok(None);
        };

        if !auth.active {
            return Err(AppError::Unauthorized("Account is not active".to_string()));
        }

        if verify_password(password, &auth.password)? {
            Ok(Some(auth.id))
        } else {
            Ok(None)
        }
    }

    /// Creates the user row and its credentials together.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> AppResult<User> {
        let id = uuid::Uuid::new_v4().to_string();
        let email = email.trim().to_lowercase();
        let password_hash = hash_password(password)?;
        let now = current_timestamp_seconds();

        let mut tx = self.db.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO "user" (id, name, email, role, last_active_at, updated_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(&email)
        .bind(role)
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO auth (id, email, password, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&id)
        .bind(&email)
        .bind(password_hash)
        .bind(true)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        UserService::new(self.db)
            .get_user_by_id(&id)
            .await?
            .ok_or_else(|| AppError::InternalServerError("Failed to create user".to_string()))
    }

    /// Creates the first admin from `ADMIN_EMAIL`/`ADMIN_PASSWORD` when the
    /// user table is still empty.
    pub async fn bootstrap_admin(&self, config: &Config) -> AppResult<Option<User>> {
        let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
            return Ok(None);
        };

        if UserService::new(self.db).count_users().await? > 0 {
            return Ok(None);
        }

        let user = self
            .register(&config.admin_name, email, password, ADMIN_ROLE)
            .await?;
        tracing::info!("Created admin account {}", user.email);
        Ok(Some(user))
    }
}
