use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::cache_manager::CacheKey;
use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::TestimonialPatch;
use crate::services::TestimonialService;
use crate::AppState;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_testimonials))
            .route(web::post().to(create_testimonial)),
    )
    .service(
        web::resource("/{id}")
            .route(web::patch().to(update_testimonial))
            .route(web::delete().to(delete_testimonial)),
    )
    .route("/{id}/toggle", web::post().to(toggle_testimonial));
}

async fn list_testimonials(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let testimonials = TestimonialService::new(&state.db)
        .list_all()
        .await
        .map_err(|e| e.during("load testimonials"))?;

    Ok(HttpResponse::Ok().json(testimonials))
}

async fn create_testimonial(
    state: web::Data<AppState>,
    auth_user: AuthUser,
) -> AppResult<HttpResponse> {
    let testimonial = TestimonialService::new(&state.db)
        .create_testimonial()
        .await
        .map_err(|e| e.during("add testimonial"))?;

    state.cache.invalidate(&CacheKey::Testimonials).await;
    tracing::info!("{} added testimonial {}", auth_user.email, testimonial.id);

    Ok(HttpResponse::Created().json(testimonial))
}

async fn update_testimonial(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
    patch: web::Json<TestimonialPatch>,
) -> AppResult<HttpResponse> {
    let testimonial = TestimonialService::new(&state.db)
        .update_testimonial(&id, &patch)
        .await
        .map_err(|e| e.during("save testimonial"))?;

    state.cache.invalidate(&CacheKey::Testimonials).await;
    tracing::info!("{} saved testimonial {}", auth_user.email, testimonial.id);

    Ok(HttpResponse::Ok().json(testimonial))
}

async fn toggle_testimonial(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let testimonial = TestimonialService::new(&state.db)
        .toggle_testimonial(&id)
        .await
        .map_err(|e| e.during("toggle testimonial"))?;

    state.cache.invalidate(&CacheKey::Testimonials).await;
    tracing::info!(
        "{} set testimonial {} active={}",
        auth_user.email,
        testimonial.id,
        testimonial.is_active
    );

    Ok(HttpResponse::Ok().json(testimonial))
}

async fn delete_testimonial(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    TestimonialService::new(&state.db)
        .delete_testimonial(&id)
        .await
        .map_err(|e| e.during("delete testimonial"))?;

    state.cache.invalidate(&CacheKey::Testimonials).await;
    tracing::info!("{} deleted testimonial {}", auth_user.email, id);

    Ok(HttpResponse::Ok().json(json!({ "status": true })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{bearer, get_json, read_json, test_app, TestContext};
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    #[actix_web::test]
    async fn test_text_rating_falls_back_to_five() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;
        let token = ctx.admin_token().await;

        let req = test::TestRequest::patch()
            .uri("/api/v1/admin/testimonials/seed-testimonial-3")
            .insert_header(bearer(&token))
            .set_json(json!({"rating": "2"}))
            .to_request();
        let (status, saved) = read_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["rating"], 2);

        let req = test::TestRequest::patch()
            .uri("/api/v1/admin/testimonials/seed-testimonial-3")
            .insert_header(bearer(&token))
            .set_json(json!({"rating": "wonderful"}))
            .to_request();
        let (_, saved) = read_json(test::call_service(&app, req).await).await;
        assert_eq!(saved["rating"], 5);
        assert_eq!(saved["name"], "Riya Patel");

        let (_, public) = get_json(&app, "/api/v1/content/testimonials").await;
        assert_eq!(public[2]["stars"], 5);
    }

    #[actix_web::test]
    async fn test_out_of_range_rating_is_clamped_for_display() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;
        let token = ctx.admin_token().await;

        let req = test::TestRequest::patch()
            .uri("/api/v1/admin/testimonials/seed-testimonial-1")
            .insert_header(bearer(&token))
            .set_json(json!({"rating": 9}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let (_, public) = get_json(&app, "/api/v1/content/testimonials").await;
        assert_eq!(public[0]["rating"], 9);
        assert_eq!(public[0]["stars"], 5);
    }
}
