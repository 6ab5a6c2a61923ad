use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// One row per section key. `content` is a schema-less field map; the
/// resolver projects it into typed overrides.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteSetting {
    pub id: String,
    pub section_key: String,
    #[sqlx(skip)]
    pub content: Map<String, Value>,
    #[serde(skip)]
    #[sqlx(default)]
    pub content_str: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SiteSetting {
    pub fn parse_content(&mut self) {
        self.content = self
            .content_str
            .as_deref()
            .map(parse_content_map)
            .unwrap_or_default();
    }
}

/// Stored content that is not a JSON object (or not JSON at all) reads as
/// an empty map so the section falls back to its defaults.
pub fn parse_content_map(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            tracing::warn!("Ignoring malformed site setting content");
            Map::new()
        }
    }
}

/// Field-level patch for one section. A `null` or blank string clears the
/// override so the public site shows the default again.
pub type SettingsPatch = Map<String, Value>;

pub fn apply_settings_patch(content: &mut Map<String, Value>, patch: SettingsPatch) {
    for (field, value) in patch {
        let clears = match &value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        if clears {
            content.remove(&field);
        } else {
            content.insert(field, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_content_map_tolerates_garbage() {
        assert!(parse_content_map("not json").is_empty());
        assert!(parse_content_map("[1, 2]").is_empty());
        assert_eq!(
            parse_content_map(r#"{"title": "Custom Studio"}"#).get("title"),
            Some(&json!("Custom Studio"))
        );
    }

    #[test]
    fn test_patch_touches_only_named_fields() {
        let mut content = parse_content_map(r#"{"title": "A", "subtitle": "B", "tagline": "C"}"#);
        let patch = json!({"title": "New", "tagline": ""});
        let Value::Object(patch) = patch else { unreachable!() };

        apply_settings_patch(&mut content, patch);

        assert_eq!(content.get("title"), Some(&json!("New")));
        assert_eq!(content.get("subtitle"), Some(&json!("B")));
        assert!(!content.contains_key("tagline"));
    }
}
