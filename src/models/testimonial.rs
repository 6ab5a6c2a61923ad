use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_RATING: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub text: String,
    pub rating: i64,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestimonialPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub text: Option<String>,
    pub rating: Option<RatingInput>,
    pub is_active: Option<bool>,
}

impl TestimonialPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.text.is_none()
            && self.rating.is_none()
            && self.is_active.is_none()
    }
}

/// Rating as typed into the admin form: a number or free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RatingInput {
    pub fn value(&self) -> i64 {
        match self {
            RatingInput::Integer(n) => or_default(*n),
            RatingInput::Float(f) if f.is_finite() => or_default(f.trunc() as i64),
            RatingInput::Float(_) => DEFAULT_RATING,
            RatingInput::Text(s) => parse_rating(s),
        }
    }
}

/// Leading integer of `raw` (after whitespace, optional sign). No digits,
/// overflow or zero all yield the default rating.
pub fn parse_rating(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<i64>() {
        Ok(n) => or_default(sign * n),
        Err(_) => DEFAULT_RATING,
    }
}

fn or_default(rating: i64) -> i64 {
    if rating == 0 {
        DEFAULT_RATING
    } else {
        rating
    }
}
