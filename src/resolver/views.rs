//! Public view models for the collection sections.

use super::icons::Icon;
use crate::models::{GalleryItem, Service, Testimonial};
use serde::Serialize;

pub const ALL_CATEGORY: &str = "All";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub icon: Icon,
}

impl From<Service> for ServiceView {
    fn from(service: Service) -> Self {
        ServiceView {
            icon: Icon::from_name(service.icon.as_deref()),
            id: service.id,
            title: service.title,
            description: service.description.unwrap_or_default(),
            price: service.price.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryItemView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image_url: String,
}

impl From<GalleryItem> for GalleryItemView {
    fn from(item: GalleryItem) -> Self {
        GalleryItemView {
            id: item.id,
            title: item.title,
            category: item.category,
            image_url: item.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestimonialView {
    pub id: String,
    pub name: String,
    pub role: String,
    pub text: String,
    pub rating: i64,
    /// Filled stars to draw, always 1 to 5.
    pub stars: u8,
}

impl From<Testimonial> for TestimonialView {
    fn from(testimonial: Testimonial) -> Self {
        TestimonialView {
            stars: testimonial.rating.clamp(1, 5) as u8,
            id: testimonial.id,
            name: testimonial.name,
            role: testimonial.role.unwrap_or_default(),
            text: testimonial.text,
            rating: testimonial.rating,
        }
    }
}

/// `All` keeps every item; any other category must match exactly.
pub fn filter_by_category(items: Vec<GalleryItemView>, category: &str) -> Vec<GalleryItemView> {
    if category == ALL_CATEGORY {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.category == category)
        .collect()
}

/// `All` followed by each distinct category in first-seen order.
pub fn categories(items: &[GalleryItemView]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORY.to_string()];
    for item in items {
        if !categories.contains(&item.category) {
            categories.push(item.category.clone());
        }
    }
    categories
}
