//! Public content API. Every endpoint answers with a complete view model;
//! store trouble degrades to literal defaults or empty lists.

use actix_web::{web, HttpResponse};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::future::Future;
use std::time::Duration;
use validator::Validate;

use crate::cache_manager::CacheKey;
use crate::error::{AppError, AppResult};
use crate::resolver::messaging::{whatsapp_button_link, whatsapp_inquiry_link, Inquiry};
use crate::resolver::sections::ContactContent;
use crate::resolver::views::{
    categories, filter_by_category, GalleryItemView, ServiceView, TestimonialView, ALL_CATEGORY,
};
use crate::resolver::{resolve_collection, resolve_section, Fetch, SectionKey};
use crate::services::{CatalogService, GalleryService, SiteSettingService, TestimonialService};
use crate::AppState;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/sections", web::get().to(get_sections))
        .route("/sections/{key}", web::get().to(get_section))
        .route("/services", web::get().to(get_services))
        .route("/gallery", web::get().to(get_gallery))
        .route("/testimonials", web::get().to(get_testimonials))
        .route("/whatsapp", web::get().to(get_whatsapp_link))
        .route("/inquiry", web::post().to(create_inquiry_link));
}

/// Reads through the content cache under the configured deadline.
async fn fetch_content<T, F, Fut>(state: &AppState, key: CacheKey, fetch: F) -> Fetch<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let deadline = Duration::from_millis(state.config.content_fetch_timeout_ms);

    match tokio::time::timeout(deadline, state.cache.get_or_fetch(&key, fetch)).await {
        Ok(Ok(value)) => Fetch::Resolved(value),
        Ok(Err(e)) => {
            tracing::warn!("Serving fallback content for {}: {}", key, e);
            Fetch::Failed(e.to_string())
        }
        Err(_) => {
            tracing::warn!("Content lookup for {} timed out after {:?}", key, deadline);
            Fetch::Pending
        }
    }
}

async fn fetch_section(state: &AppState, key: SectionKey) -> Fetch<Option<Map<String, Value>>> {
    fetch_content(
        state,
        CacheKey::SiteSetting(key.as_str().to_string()),
        || async move { SiteSettingService::new(&state.db).get_content(key.as_str()).await },
    )
    .await
}

async fn get_sections(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let mut sections = Map::new();
    for key in SectionKey::ALL {
        let view = key.resolve(&fetch_section(&state, key).await);
        sections.insert(
            key.as_str().to_string(),
            serde_json::to_value(view).map_err(|e| AppError::InternalServerError(e.to_string()))?,
        );
    }

    Ok(HttpResponse::Ok().json(sections))
}

async fn get_section(
    state: web::Data<AppState>,
    key: web::Path<String>,
) -> AppResult<HttpResponse> {
    let key = SectionKey::parse(&key)
        .ok_or_else(|| AppError::NotFound(format!("Unknown section: {}", key)))?;

    let view = key.resolve(&fetch_section(&state, key).await);
    Ok(HttpResponse::Ok().json(view))
}

async fn get_services(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let db = &state.db;
    let fetch = fetch_content(&state, CacheKey::Services, || async move {
        CatalogService::new(db).list_active().await
    })
    .await;

    let services: Vec<ServiceView> = resolve_collection(fetch, ServiceView::from);
    Ok(HttpResponse::Ok().json(services))
}

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
struct GalleryResponse {
    categories: Vec<String>,
    category: String,
    items: Vec<GalleryItemView>,
}

async fn get_gallery(
    state: web::Data<AppState>,
    query: web::Query<GalleryQuery>,
) -> AppResult<HttpResponse> {
    let db = &state.db;
    let fetch = fetch_content(&state, CacheKey::GalleryItems, || async move {
        GalleryService::new(db).list_active().await
    })
    .await;

    let items: Vec<GalleryItemView> = resolve_collection(fetch, GalleryItemView::from);
    let category = query
        .into_inner()
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| ALL_CATEGORY.to_string());

    Ok(HttpResponse::Ok().json(GalleryResponse {
        categories: categories(&items),
        items: filter_by_category(items, &category),
        category,
    }))
}

async fn get_testimonials(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let db = &state.db;
    let fetch = fetch_content(&state, CacheKey::Testimonials, || async move {
        TestimonialService::new(db).list_active().await
    })
    .await;

    let testimonials: Vec<TestimonialView> = resolve_collection(fetch, TestimonialView::from);
    Ok(HttpResponse::Ok().json(testimonials))
}

async fn contact(state: &AppState) -> ContactContent {
    resolve_section(&fetch_section(state, SectionKey::Contact).await)
}

async fn get_whatsapp_link(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let contact = contact(&state).await;
    Ok(HttpResponse::Ok().json(json!({ "url": whatsapp_button_link(&contact.whatsapp) })))
}

async fn create_inquiry_link(
    state: web::Data<AppState>,
    inquiry: web::Json<Inquiry>,
) -> AppResult<HttpResponse> {
    inquiry
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let contact = contact(&state).await;
    Ok(HttpResponse::Ok().json(json!({
        "url": whatsapp_inquiry_link(&contact.whatsapp, &inquiry)
    })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get_json, test_app, TestContext};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_hero_defaults_without_record() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;

        let (status, hero) = get_json(&app, "/api/v1/content/sections/hero").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hero["title"], "GlamourStudio");
        assert_eq!(hero["subtitle"], "Transforming Beauty with Expertise & Elegance");
        assert_eq!(hero["title_spans"]["accent"], "Studio");
    }

    #[actix_web::test]
    async fn test_unknown_section_is_not_found() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;

        let (status, _) = get_json(&app, "/api/v1/content/sections/pricing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_all_sections_in_one_call() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;

        let (status, body) = get_json(&app, "/api/v1/content/sections").await;
        assert_eq!(status, StatusCode::OK);
        for key in ["hero", "about", "contact", "footer"] {
            assert!(body[key].is_object(), "missing {}", key);
        }
        assert_eq!(body["about"]["stats"].as_array().map(Vec::len), Some(4));
    }

    #[actix_web::test]
    async fn test_store_failure_degrades_silently() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;
        ctx.db.pool.close().await;

        let (status, hero) = get_json(&app, "/api/v1/content/sections/hero").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hero["title"], "GlamourStudio");

        let (status, services) = get_json(&app, "/api/v1/content/services").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(services, json!([]));
    }

    #[actix_web::test]
    async fn test_services_carry_icons() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;

        let (_, services) = get_json(&app, "/api/v1/content/services").await;
        let services = services.as_array().unwrap();
        assert_eq!(services.len(), 6);
        assert_eq!(services[0]["title"], "Bridal Makeup");
        assert_eq!(services[0]["icon"], "Crown");
    }

    #[actix_web::test]
    async fn test_gallery_filter() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;

        let (_, all) = get_json(&app, "/api/v1/content/gallery").await;
        assert_eq!(all["category"], "All");
        assert_eq!(all["items"].as_array().map(Vec::len), Some(6));
        assert_eq!(all["categories"], json!(["All", "Bridal", "Party", "Editorial"]));

        let (_, bridal) = get_json(&app, "/api/v1/content/gallery?category=Bridal").await;
        let items = bridal["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item["category"] == "Bridal"));

        let (_, lower) = get_json(&app, "/api/v1/content/gallery?category=bridal").await;
        assert_eq!(lower["items"], json!([]));
    }

    #[actix_web::test]
    async fn test_testimonials_have_stars() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;

        let (_, testimonials) = get_json(&app, "/api/v1/content/testimonials").await;
        let testimonials = testimonials.as_array().unwrap();
        assert_eq!(testimonials.len(), 3);
        assert!(testimonials.iter().all(|t| t["stars"] == 5));
    }

    #[actix_web::test]
    async fn test_whatsapp_links_use_default_number() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;

        let (_, body) = get_json(&app, "/api/v1/content/whatsapp").await;
        let url = body["url"].as_str().unwrap();
        assert!(url.starts_with("https://wa.me/919999999999?text=Hi%21"));

        let req = test::TestRequest::post()
            .uri("/api/v1/content/inquiry")
            .set_json(json!({"name": "Asha", "service": "HD Makeup", "message": "Hello"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["url"]
            .as_str()
            .unwrap()
            .contains("I%27m%20interested%20in%20HD%20Makeup."));

        let req = test::TestRequest::post()
            .uri("/api/v1/content/inquiry")
            .set_json(json!({"name": "Asha", "service": null, "message": null}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_inquiry_requires_name() {
        let ctx = TestContext::new().await;
        let app = test::init_service(test_app(&ctx)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/content/inquiry")
            .set_json(json!({"name": "", "message": "Hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
