//! Admin editor API. Mounted behind `AdminMiddleware`.
//!
//! Writes go to the store first; the matching content cache key is
//! invalidated only once the write has succeeded.

use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

use crate::cache_manager::CacheKey;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::resolver::SectionKey;
use crate::services::SiteSettingService;
use crate::AppState;

use super::{cache, catalog, gallery, testimonials};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/settings", web::get().to(list_settings))
        .route("/settings/{key}", web::patch().to(update_setting))
        .service(web::scope("/services").configure(catalog::create_routes))
        .service(web::scope("/gallery").configure(gallery::create_routes))
        .service(web::scope("/testimonials").configure(testimonials::create_routes))
        .configure(cache::configure);
}

async fn list_settings(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let settings = SiteSettingService::new(&state.db)
        .list()
        .await
        .map_err(|e| e.during("load settings"))?;

    let by_key: Map<String, Value> = settings
        .into_iter()
        .map(|setting| (setting.section_key, Value::Object(setting.content)))
        .collect();

    Ok(HttpResponse::Ok().json(by_key))
}

async fn update_setting(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    key: web::Path<String>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let key = SectionKey::parse(&key)
        .ok_or_else(|| AppError::NotFound(format!("Unknown section: {}", key)))?;

    let Value::Object(patch) = body.into_inner() else {
        return Err(AppError::BadRequest(
            "Section content must be a JSON object".to_string(),
        ));
    };

    let setting = SiteSettingService::new(&state.db)
        .patch(key.as_str(), patch)
        .await
        .map_err(|e| e.during("save section"))?;

    state
        .cache
        .invalidate(&CacheKey::SiteSetting(key.as_str().to_string()))
        .await;
    tracing::info!("{} updated section {}", auth_user.email, key.as_str());

    Ok(HttpResponse::Ok().json(setting))
}
