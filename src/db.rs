use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

const MIGRATIONS: &[(i64, &str)] = &[
    (1, include_str!("../migrations/sqlite/001_initial.sql")),
    (2, include_str!("../migrations/sqlite/002_seed_content.sql")),
];

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        if let Some(parent) = connect_options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .connect_with(connect_options)
            .await?;

        Ok(Database { pool })
    }

    /// Single-connection in-memory database. Every pooled connection to
    /// `:memory:` would otherwise see its own empty database.
    #[cfg(test)]
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;

        Ok(Database { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _migrations (version INTEGER PRIMARY KEY, applied_at INTEGER NOT NULL)",
        )
        .execute(&self.pool)
        .await?;

        for (version, migration_sql) in MIGRATIONS {
            let applied: Option<i64> =
                sqlx::query_scalar("SELECT version FROM _migrations WHERE version = $1")
                    .bind(version)
                    .fetch_optional(&self.pool)
                    .await?;

            if applied.is_some() {
                tracing::debug!("Migration {} already applied", version);
                continue;
            }

            tracing::info!("Running migration {}", version);

            let mut tx = self.pool.begin().await?;
            for statement in split_statements(migration_sql) {
                sqlx::query(&statement).execute(&mut *tx).await.map_err(|e| {
                    anyhow::anyhow!("Migration {} failed on `{}`: {}", version, statement, e)
                })?;
            }
            sqlx::query("INSERT INTO _migrations (version, applied_at) VALUES ($1, $2)")
                .bind(version)
                .bind(crate::utils::time::current_timestamp_seconds())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }

        tracing::info!("All migrations completed");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Splits a migration file into statements, dropping `--` comment lines.
fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|chunk| {
            chunk
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}
