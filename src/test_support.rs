//! Shared fixtures for handler tests.

use actix_http::Request;
use actix_web::{
    body::{to_bytes, MessageBody},
    dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse},
    http::{header, StatusCode},
    test, web, App,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use crate::cache_manager::CacheManager;
use crate::config::Config;
use crate::db::Database;
use crate::models::ADMIN_ROLE;
use crate::services::AuthService;
use crate::storage::{LocalObjectStore, ObjectStore, StorageError};
use crate::utils::auth::create_jwt;
use crate::AppState;

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub db: Database,
    pub upload_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::build(None).await
    }

    pub async fn with_storage(storage: Arc<dyn ObjectStore>) -> Self {
        Self::build(Some(storage)).await
    }

    async fn build(storage: Option<Arc<dyn ObjectStore>>) -> Self {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();

        let upload_dir = tempfile::tempdir().unwrap();
        let config = Config {
            secret_key: "test-secret".to_string(),
            upload_dir: upload_dir.path().display().to_string(),
            upload_max_bytes: 1024,
            ..Config::default()
        };
        let storage = storage.unwrap_or_else(|| {
            Arc::new(LocalObjectStore::new(
                upload_dir.path(),
                &config.public_upload_base_url,
            ))
        });

        let state = web::Data::new(AppState {
            db: db.clone(),
            cache: Arc::new(CacheManager::new(Duration::from_secs(
                config.content_cache_ttl_secs,
            ))),
            config: Arc::new(config),
            storage,
        });

        TestContext {
            state,
            db,
            upload_dir,
        }
    }

    pub async fn token_for(&self, email: &str, role: &str) -> String {
        let user = AuthService::new(&self.db)
            .register("Test User", email, "password", role)
            .await
            .unwrap();
        let (token, _) = create_jwt(&user.id, &self.state.config.secret_key, "1h").unwrap();
        token
    }

    pub async fn admin_token(&self) -> String {
        self.token_for("admin@studio.test", ADMIN_ROLE).await
    }
}

pub fn test_app(
    ctx: &TestContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ctx.state.clone())
        .configure(crate::configure_app)
}

pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = resp.status();
    let body = test::read_body(resp).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Like `read_json` over `test::call_service`, but errors raised by
/// middleware are rendered the way the server would render them.
pub async fn call_json<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match app.call(req).await {
        Ok(resp) => read_json(resp).await,
        Err(e) => {
            let resp = e.error_response();
            let status = resp.status();
            let body = to_bytes(resp.into_body()).await.unwrap_or_default();
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
    }
}

pub async fn get_json<S, B>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    read_json(test::call_service(app, req).await).await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Object store that refuses every upload.
pub struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn put(&self, _path: &str, _bytes: Vec<u8>) -> Result<String, StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "bucket unavailable",
        )))
    }
}
