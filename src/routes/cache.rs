//! Content cache administration

use actix_web::{delete, get, web, HttpResponse};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::AppState;

/// Get cache statistics
#[get("/cache/stats")]
pub async fn get_cache_stats(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = state.cache.get_stats().await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "hits": stats.hits,
        "misses": stats.misses,
        "sets": stats.sets,
        "deletes": stats.deletes,
        "evictions": stats.evictions,
        "size": stats.size,
        "hit_rate": stats.hit_rate(),
    })))
}

/// Drop every cached section and collection
#[delete("/cache")]
pub async fn clear_content_cache(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    state
        .cache
        .clear_all()
        .await
        .map_err(|e| AppError::InternalServerError(format!("Failed to clear cache: {}", e)))?;
    tracing::info!("{} cleared the content cache", user.email);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Content cache cleared"
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_cache_stats).service(clear_content_cache);
}

#[cfg(test)]
mod tests {
    use crate::test_support::{bearer, get_json, read_json, test_app, TestContext};
    use actix_web::{http::StatusCode, test};

    #[actix_web::test]
    async fn test_stats_and_clear() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;
        let token = ctx.admin_token().await;

        get_json(&app, "/api/v1/content/services").await;
        get_json(&app, "/api/v1/content/services").await;

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/cache/stats")
            .insert_header(bearer(&token))
            .to_request();
        let (status, stats) = read_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["hits"], 1);
        assert_eq!(stats["size"], 1);

        let req = test::TestRequest::delete()
            .uri("/api/v1/admin/cache")
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert_eq!(ctx.state.cache.get_stats().await.size, 0);
    }
}
