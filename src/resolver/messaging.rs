//! Deep links into the studio's WhatsApp chat.

use super::sections::DEFAULT_WHATSAPP_NUMBER;
use serde::Deserialize;
use validator::Validate;

pub const BUTTON_GREETING: &str = "Hi! I'm interested in your makeup services.";

/// Contact form submission turned into a prefilled chat message.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Inquiry {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Inquiry {
    pub fn message_text(&self) -> String {
        let service = self
            .service
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("your services");
        format!(
            "Hi! I'm {}. I'm interested in {}. {}",
            self.name,
            service,
            self.message.as_deref().unwrap_or_default()
        )
    }
}

pub fn whatsapp_inquiry_link(number: &str, inquiry: &Inquiry) -> String {
    whatsapp_link(number, &inquiry.message_text())
}

pub fn whatsapp_button_link(number: &str) -> String {
    whatsapp_link(number, BUTTON_GREETING)
}

fn whatsapp_link(number: &str, text: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        dial_digits(number),
        urlencoding::encode(text)
    )
}

/// Digits of `number`, or the studio's default line when none remain.
fn dial_digits(number: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        DEFAULT_WHATSAPP_NUMBER.to_string()
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_link() {
        let inquiry = Inquiry {
            name: "Asha".to_string(),
            service: Some("Bridal Makeup".to_string()),
            message: Some("Dec 12?".to_string()),
        };
        assert_eq!(
            whatsapp_inquiry_link("+91 99999 99999", &inquiry),
            "https://wa.me/919999999999?text=Hi%21%20I%27m%20Asha.%20I%27m%20interested%20in%20Bridal%20Makeup.%20Dec%2012%3F"
        );
    }

    #[test]
    fn test_inquiry_without_service() {
        let inquiry = Inquiry {
            name: "Asha".to_string(),
            service: Some("  ".to_string()),
            message: None,
        };
        assert_eq!(
            inquiry.message_text(),
            "Hi! I'm Asha. I'm interested in your services. "
        );
    }

    #[test]
    fn test_null_message_is_accepted() {
        let inquiry: Inquiry =
            serde_json::from_value(serde_json::json!({"name": "Asha", "message": null})).unwrap();
        assert_eq!(inquiry.message, None);
        assert_eq!(
            inquiry.message_text(),
            "Hi! I'm Asha. I'm interested in your services. "
        );
    }

    #[test]
    fn test_button_link_and_fallback_number() {
        let link = whatsapp_button_link("not a number");
        assert!(link.starts_with("https://wa.me/919999999999?text="));
        assert!(link.ends_with("Hi%21%20I%27m%20interested%20in%20your%20makeup%20services."));
    }
}
