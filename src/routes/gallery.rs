use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use serde_json::json;

use crate::cache_manager::CacheKey;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::GalleryItemPatch;
use crate::services::GalleryService;
use crate::storage::{image_extension, object_path};
use crate::utils::time::current_timestamp_millis;
use crate::AppState;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_items))
            .route(web::post().to(create_item)),
    )
    .service(
        web::resource("/{id}")
            .route(web::patch().to(update_item))
            .route(web::delete().to(delete_item)),
    )
    .route("/{id}/toggle", web::post().to(toggle_item))
    .route("/{id}/image", web::post().to(upload_image));
}

async fn list_items(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let items = GalleryService::new(&state.db)
        .list_all()
        .await
        .map_err(|e| e.during("load gallery"))?;

    Ok(HttpResponse::Ok().json(items))
}

async fn create_item(state: web::Data<AppState>, auth_user: AuthUser) -> AppResult<HttpResponse> {
    let item = GalleryService::new(&state.db)
        .create_item()
        .await
        .map_err(|e| e.during("add image"))?;

    state.cache.invalidate(&CacheKey::GalleryItems).await;
    tracing::info!("{} added gallery item {}", auth_user.email, item.id);

    Ok(HttpResponse::Created().json(item))
}

async fn update_item(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
    patch: web::Json<GalleryItemPatch>,
) -> AppResult<HttpResponse> {
    let item = GalleryService::new(&state.db)
        .update_item(&id, &patch)
        .await
        .map_err(|e| e.during("save gallery item"))?;

    state.cache.invalidate(&CacheKey::GalleryItems).await;
    tracing::info!("{} saved gallery item {}", auth_user.email, item.id);

    Ok(HttpResponse::Ok().json(item))
}

async fn toggle_item(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let item = GalleryService::new(&state.db)
        .toggle_item(&id)
        .await
        .map_err(|e| e.during("toggle gallery item"))?;

    state.cache.invalidate(&CacheKey::GalleryItems).await;
    tracing::info!(
        "{} set gallery item {} active={}",
        auth_user.email,
        item.id,
        item.is_active
    );

    Ok(HttpResponse::Ok().json(item))
}

async fn delete_item(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    GalleryService::new(&state.db)
        .delete_item(&id)
        .await
        .map_err(|e| e.during("delete gallery item"))?;

    state.cache.invalidate(&CacheKey::GalleryItems).await;
    tracing::info!("{} deleted gallery item {}", auth_user.email, id);

    Ok(HttpResponse::Ok().json(json!({ "status": true })))
}

// POST /{id}/image - replace a gallery item's picture (multipart `file`)
async fn upload_image(
    state: web::Data<AppState>,
    auth_user: AuthUser,
    id: web::Path<String>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let gallery = GalleryService::new(&state.db);
    gallery
        .require(&id)
        .await
        .map_err(|e| e.during("upload image"))?;

    let max_bytes = state.config.upload_max_bytes;
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;
        let content_disposition = field.content_disposition().cloned();
        let field_name = content_disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .unwrap_or("");

        if field_name != "file" {
            continue;
        }

        filename = content_disposition
            .as_ref()
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Chunk error: {}", e)))?;
            if data.len() + chunk.len() > max_bytes {
                return Err(AppError::BadRequest(format!(
                    "Image exceeds the {} byte upload limit",
                    max_bytes
                )));
            }
            data.extend_from_slice(&chunk);
        }
        file_data = Some(data);
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;
    let filename =
        filename.ok_or_else(|| AppError::BadRequest("filename is required".to_string()))?;
    let extension = image_extension(&filename).ok_or_else(|| {
        AppError::BadRequest(format!("{} is not a supported image type", filename))
    })?;

    let path = object_path("gallery", &extension, current_timestamp_millis());
    let image_url = state
        .storage
        .put(&path, file_data)
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;

    let item = gallery
        .update_item(&id, &GalleryItemPatch::image(image_url))
        .await
        .map_err(|e| e.during("save image"))?;

    state.cache.invalidate(&CacheKey::GalleryItems).await;
    tracing::info!(
        "{} uploaded {} for gallery item {}",
        auth_user.email,
        path,
        item.id
    );

    Ok(HttpResponse::Ok().json(item))
}
