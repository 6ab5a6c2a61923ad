use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image_url: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryItemPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl GalleryItemPatch {
    pub fn image(image_url: String) -> Self {
        GalleryItemPatch {
            image_url: Some(image_url),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
            && self.is_active.is_none()
    }
}
