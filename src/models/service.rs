use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Editable service fields. Absent fields keep their stored value.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServicePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

impl ServicePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.icon.is_none()
            && self.is_active.is_none()
    }
}
