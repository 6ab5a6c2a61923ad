mod cache_manager;
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod resolver;
mod routes;
mod services;
mod storage;
mod utils;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{
    http::header,
    middleware::{Compress, Logger, NormalizePath},
    web, App, HttpResponse, HttpServer,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::cache_manager::CacheManager;
use crate::config::Config;
use crate::db::Database;
use crate::error::AppError;
use crate::routes::create_routes;
use crate::services::AuthService;
use crate::storage::{LocalObjectStore, ObjectStore};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    /// Content cache shared by public reads and admin invalidations
    pub cache: Arc<CacheManager>,
    pub storage: Arc<dyn ObjectStore>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    dotenvy::dotenv().ok();

    let log_level = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Studio CMS backend");

    let config = Config::from_env()?;
    info!("Configuration loaded from environment");

    let db = Database::new(&config.database_url).await?;
    info!("Database connected");

    db.run_migrations().await?;
    info!("Database migrations completed");

    AuthService::new(&db).bootstrap_admin(&config).await?;

    std::fs::create_dir_all(&config.upload_dir)?;
    let storage = Arc::new(LocalObjectStore::new(
        &config.upload_dir,
        &config.public_upload_base_url,
    ));

    let cache = Arc::new(CacheManager::new(Duration::from_secs(
        config.content_cache_ttl_secs,
    )));
    cache.start_cleanup_task();

    let state = web::Data::new(AppState {
        db,
        config: Arc::new(config.clone()),
        cache,
        storage,
    });

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let cors_allow_origin = config.cors_allow_origin.clone();
    let upload_dir = config.upload_dir.clone();

    info!("Server running at http://{}", addr);

    HttpServer::new(move || {
        let cors = if cors_allow_origin == "*" {
            Cors::default()
                .allowed_origin_fn(|_origin, _req_head| true)
                .allow_any_method()
                .allow_any_header()
                .expose_headers(vec![header::SET_COOKIE])
                .supports_credentials()
                .max_age(3600)
        } else {
            let mut cors = Cors::default();
            for origin in cors_allow_origin.split(',').map(|s| s.trim()) {
                cors = cors.allowed_origin(origin);
            }
            cors.allowed_methods(vec!["GET", "POST", "DELETE", "PATCH", "OPTIONS"])
                .allowed_headers(vec![
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::COOKIE,
                ])
                .expose_headers(vec![header::SET_COOKIE])
                .supports_credentials()
                .max_age(3600)
        };

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(Files::new("/uploads", &upload_dir))
            .configure(configure_app)
    })
    .keep_alive(actix_web::http::KeepAlive::Timeout(Duration::from_secs(75)))
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}

/// Routes shared by the server and the handler tests.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/health/db", web::get().to(health_check_db))
        .service(web::scope("/api/v1").configure(create_routes));
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": true }))
}

async fn health_check_db(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    sqlx::query("SELECT 1").execute(state.db.pool()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": true })))
}
