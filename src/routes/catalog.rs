use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::cache_manager::CacheKey;
use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::ServicePatch;
use crate::services::CatalogService;
use crate::AppState;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_services))
            .route(web::post().to(create_service)),
    )
    .service(
        web::resource("/{id}")
            .route(web::patch().to(update_service))
            .route(web::delete().to(delete_service)),
    )
    .route("/{id}/toggle", web::post().to(toggle_service));
}

async fn list_services(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let services = CatalogService::new(&state.db)
        .list_all()
        .await
        .map_err(|e| e.during("load services"))?;

    Ok(HttpResponse::Ok().json(services))
}

async fn create_service(
    state: web::Data<AppState>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    let service = CatalogService::new(&state.db)
        .create_service()
        .await
        .map_err(|e| e.during("add service"))?;

    state.cache.invalidate(&CacheKey::Services).await;
    tracing::info!("{} added service {}", auth_user.email, service.id);

    Ok(HttpResponse::Created().json(service))
}

async fn update_service(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
    patch: web::Json<ServicePatch>,
) -> AppResult<HttpResponse> {
    let service = CatalogService::new(&state.db)
        .update_service(&id, &patch)
        .await
        .map_err(|e| e.during("save service"))?;

    state.cache.invalidate(&CacheKey::Services).await;
    tracing::info!("{} saved service {}", auth_user.email, service.id);

    Ok(HttpResponse::Ok().json(service))
}

async fn toggle_service(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let service = CatalogService::new(&state.db)
        .toggle_service(&id)
        .await
        .map_err(|e| e.during("toggle service"))?;

    state.cache.invalidate(&CacheKey::Services).await;
    tracing::info!(
        "{} set service {} active={}",
        auth_user.email,
        service.id,
        service.is_active
    );

    Ok(HttpResponse::Ok().json(service))
}

async fn delete_service(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    CatalogService::new(&state.db)
        .delete_service(&id)
        .await
        .map_err(|e| e.during("delete service"))?;

    state.cache.invalidate(&CacheKey::Services).await;
    tracing::info!("{} deleted service {}", auth_user.email, id);

    Ok(HttpResponse::Ok().json(json!({ "status": true })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{bearer, get_json, read_json, test_app, TestContext};
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    #[actix_web::test]
    async fn test_price_update_shows_publicly() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;
        let token = ctx.admin_token().await;

        let (_, before) = get_json(&app, "/api/v1/content/services").await;
        assert_eq!(before[0]["price"], "Starting ₹25,000");

        let req = test::TestRequest::patch()
            .uri("/api/v1/admin/services/seed-service-1")
            .insert_header(bearer(&token))
            .set_json(json!({"price": "Starting ₹30,000"}))
            .to_request();
        let (status, saved) = read_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["title"], "Bridal Makeup");

        let (_, after) = get_json(&app, "/api/v1/content/services").await;
        assert_eq!(after[0]["price"], "Starting ₹30,000");
        assert_eq!(after[0]["title"], before[0]["title"]);
        assert_eq!(after[0]["description"], before[0]["description"]);
        assert_eq!(after[0]["icon"], before[0]["icon"]);
    }

    #[actix_web::test]
    async fn test_toggle_hides_from_public() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;
        let token = ctx.admin_token().await;

        get_json(&app, "/api/v1/content/services").await;

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/services/seed-service-3/toggle")
            .insert_header(bearer(&token))
            .to_request();
        let (status, toggled) = read_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["is_active"], false);
        assert_eq!(toggled["title"], "HD Makeup");

        let (_, services) = get_json(&app, "/api/v1/content/services").await;
        let services = services.as_array().unwrap();
        assert_eq!(services.len(), 5);
        assert!(services.iter().all(|s| s["id"] != "seed-service-3"));

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/services")
            .insert_header(bearer(&token))
            .to_request();
        let (_, all) = read_json(test::call_service(&app, req).await).await;
        assert_eq!(all.as_array().map(Vec::len), Some(6));
    }

    #[actix_web::test]
    async fn test_create_and_delete() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;
        let token = ctx.admin_token().await;

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/services")
            .insert_header(bearer(&token))
            .to_request();
        let (status, created) = read_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "New Service");

        let (_, services) = get_json(&app, "/api/v1/content/services").await;
        assert_eq!(services.as_array().map(Vec::len), Some(7));

        let uri = format!("/api/v1/admin/services/{}", created["id"].as_str().unwrap());
        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let (_, services) = get_json(&app, "/api/v1/content/services").await;
        assert_eq!(services.as_array().map(Vec::len), Some(6));
    }

    #[actix_web::test]
    async fn test_failed_save_keeps_cached_content() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;
        let token = ctx.admin_token().await;

        let (_, before) = get_json(&app, "/api/v1/content/services").await;
        assert_eq!(before.as_array().map(Vec::len), Some(6));

        let req = test::TestRequest::patch()
            .uri("/api/v1/admin/services/no-such-service")
            .insert_header(bearer(&token))
            .set_json(json!({"price": "Free"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        sqlx::query("DROP TABLE services")
            .execute(ctx.db.pool())
            .await
            .unwrap();

        let req = test::TestRequest::patch()
            .uri("/api/v1/admin/services/seed-service-1")
            .insert_header(bearer(&token))
            .set_json(json!({"price": "Starting ₹30,000"}))
            .to_request();
        let (status, body) = read_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("save service failed:"), "unexpected detail: {}", detail);
        assert!(detail.contains("services"), "unexpected detail: {}", detail);

        // Still served from the cache: the failed write did not invalidate it
        let (_, after) = get_json(&app, "/api/v1/content/services").await;
        assert_eq!(after, before);
    }

    #[actix_web::test]
    async fn test_unknown_fields_are_rejected() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;
        let token = ctx.admin_token().await;

        let req = test::TestRequest::patch()
            .uri("/api/v1/admin/services/seed-service-1")
            .insert_header(bearer(&token))
            .set_json(json!({"sort_order": 99}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
