//! Singleton page sections and their literal defaults.

use super::icons::Icon;
use super::Fetch;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A section whose every field has a literal default. Stored content only
/// ever overrides individual fields.
pub trait SectionContent: Serialize + Sized {
    const KEY: SectionKey;

    /// Stored fields, each optional.
    type Overrides: DeserializeOwned + Default;

    fn defaults() -> Self;

    /// `override ?? default`, field by field.
    fn overlay(self, overrides: Self::Overrides) -> Self;
}

/// Complete view of section `S`. Pending and failed lookups, and sections
/// without a stored record, resolve to the defaults.
pub fn resolve_section<S: SectionContent>(fetch: &Fetch<Option<Map<String, Value>>>) -> S {
    match fetch {
        Fetch::Resolved(Some(content)) => S::defaults().overlay(project(S::KEY, content)),
        Fetch::Resolved(None) | Fetch::Pending | Fetch::Failed(_) => S::defaults(),
    }
}

fn project<O: DeserializeOwned + Default>(key: SectionKey, content: &Map<String, Value>) -> O {
    serde_json::from_value(Value::Object(content.clone())).unwrap_or_else(|e| {
        tracing::warn!("Unreadable {} content, using defaults: {}", key.as_str(), e);
        O::default()
    })
}

/// Reads a stored field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Hero,
    About,
    Contact,
    Footer,
}

impl SectionKey {
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Hero,
        SectionKey::About,
        SectionKey::Contact,
        SectionKey::Footer,
    ];

    pub fn parse(key: &str) -> Option<SectionKey> {
        SectionKey::ALL.into_iter().find(|k| k.as_str() == key)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Hero => "hero",
            SectionKey::About => "about",
            SectionKey::Contact => "contact",
            SectionKey::Footer => "footer",
        }
    }

    pub fn resolve(self, fetch: &Fetch<Option<Map<String, Value>>>) -> SectionView {
        match self {
            SectionKey::Hero => SectionView::Hero(resolve_section(fetch)),
            SectionKey::About => SectionView::About(resolve_section(fetch)),
            SectionKey::Contact => SectionView::Contact(resolve_section(fetch)),
            SectionKey::Footer => SectionView::Footer(resolve_section(fetch)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionView {
    Hero(HeroContent),
    About(AboutContent),
    Contact(ContactContent),
    Footer(FooterContent),
}

/// A heading rendered as two spans, the accent styled differently.
/// `lead` followed by `accent` always reproduces the trimmed title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleSpans {
    pub lead: String,
    pub accent: String,
}

/// Splits at the last space (the space stays with `lead`). A single word is
/// split before its last interior capital, so `GlamourStudio` becomes
/// `Glamour` + `Studio`. Anything else is all lead.
pub fn split_title(title: &str) -> TitleSpans {
    let title = title.trim();

    let split_at = match title.rfind(' ') {
        Some(space) => Some(space + 1),
        None => title
            .char_indices()
            .skip(1)
            .filter(|(_, c)| c.is_uppercase())
            .map(|(index, _)| index)
            .last(),
    };

    match split_at {
        Some(index) => TitleSpans {
            lead: title[..index].to_string(),
            accent: title[index..].to_string(),
        },
        None => TitleSpans {
            lead: title.to_string(),
            accent: String::new(),
        },
    }
}

// Hero

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroContent {
    pub eyebrow: String,
    pub title: String,
    pub title_spans: TitleSpans,
    pub subtitle: String,
    pub tagline: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HeroOverrides {
    #[serde(default, deserialize_with = "lenient")]
    pub eyebrow: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tagline: Option<String>,
}

impl SectionContent for HeroContent {
    const KEY: SectionKey = SectionKey::Hero;
    type Overrides = HeroOverrides;

    fn defaults() -> Self {
        let title = "GlamourStudio".to_string();
        HeroContent {
            eyebrow: "Welcome to".to_string(),
            title_spans: split_title(&title),
            title,
            subtitle: "Transforming Beauty with Expertise & Elegance".to_string(),
            tagline: "Professional Bridal & Party Makeup | Salon & Academy".to_string(),
        }
    }

    fn overlay(self, o: HeroOverrides) -> Self {
        let title = o.title.unwrap_or(self.title);
        HeroContent {
            eyebrow: o.eyebrow.unwrap_or(self.eyebrow),
            title_spans: split_title(&title),
            title,
            subtitle: o.subtitle.unwrap_or(self.subtitle),
            tagline: o.tagline.unwrap_or(self.tagline),
        }
    }
}

// About

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatBlock {
    pub icon: Icon,
    pub value: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct StoredStatBlock {
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<String>,
    pub value: String,
    pub label: String,
}

impl From<StoredStatBlock> for StatBlock {
    fn from(stored: StoredStatBlock) -> Self {
        StatBlock {
            icon: Icon::from_name(stored.icon.as_deref()),
            value: stored.value,
            label: stored.label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutContent {
    pub eyebrow: String,
    pub heading: String,
    pub heading_spans: TitleSpans,
    pub paragraph1: String,
    pub paragraph2: String,
    pub stats: Vec<StatBlock>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AboutOverrides {
    #[serde(default, deserialize_with = "lenient")]
    pub eyebrow: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub heading: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub paragraph1: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub paragraph2: Option<String>,
    /// Replaces the whole list; a malformed list is ignored.
    #[serde(default, deserialize_with = "lenient")]
    pub stats: Option<Vec<StoredStatBlock>>,
}

fn stat(icon: Icon, value: &str, label: &str) -> StatBlock {
    StatBlock {
        icon,
        value: value.to_string(),
        label: label.to_string(),
    }
}

impl SectionContent for AboutContent {
    const KEY: SectionKey = SectionKey::About;
    type Overrides = AboutOverrides;

    fn defaults() -> Self {
        let heading = "Mastering the Art of Beauty".to_string();
        AboutContent {
            eyebrow: "About Us".to_string(),
            heading_spans: split_title(&heading),
            heading,
            paragraph1: "At Glamour Studio, we believe every woman deserves to feel like a queen on her special day. \
                With over 15 years of experience in bridal and fashion makeup, we specialize in creating \
                looks that are not just beautiful, they're unforgettable."
                .to_string(),
            paragraph2: "Our team of expert makeup artists combines traditional techniques with modern trends to \
                deliver flawless, long-lasting makeup that complements your unique features. From intimate \
                ceremonies to grand celebrations, we bring precision, passion, and elegance to every look."
                .to_string(),
            stats: vec![
                stat(Icon::Users, "5000+", "Happy Brides"),
                stat(Icon::Award, "15+", "Years Experience"),
                stat(Icon::Sparkles, "50+", "Makeup Styles"),
                stat(Icon::Heart, "100%", "Satisfaction"),
            ],
        }
    }

    fn overlay(self, o: AboutOverrides) -> Self {
        let heading = o.heading.unwrap_or(self.heading);
        AboutContent {
            eyebrow: o.eyebrow.unwrap_or(self.eyebrow),
            heading_spans: split_title(&heading),
            heading,
            paragraph1: o.paragraph1.unwrap_or(self.paragraph1),
            paragraph2: o.paragraph2.unwrap_or(self.paragraph2),
            stats: o
                .stats
                .map(|stats| stats.into_iter().map(StatBlock::from).collect())
                .unwrap_or(self.stats),
        }
    }
}

// Contact

pub const DEFAULT_WHATSAPP_NUMBER: &str = "919999999999";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactContent {
    pub address: String,
    pub phone1: String,
    pub phone2: String,
    pub email1: String,
    pub email2: String,
    pub whatsapp: String,
    pub hours_weekday: String,
    pub hours_weekend: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactOverrides {
    #[serde(default, deserialize_with = "lenient")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone1: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone2: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email1: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email2: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub whatsapp: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hours_weekday: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hours_weekend: Option<String>,
}

impl SectionContent for ContactContent {
    const KEY: SectionKey = SectionKey::Contact;
    type Overrides = ContactOverrides;

    fn defaults() -> Self {
        ContactContent {
            address: "123, Beauty Lane, Rajouri Garden, New Delhi - 110027".to_string(),
            phone1: "+91 99999 99999".to_string(),
            phone2: "+91 88888 88888".to_string(),
            email1: "info@glamourstudio.com".to_string(),
            email2: "booking@glamourstudio.com".to_string(),
            whatsapp: DEFAULT_WHATSAPP_NUMBER.to_string(),
            hours_weekday: "Mon - Sat: 10:00 AM - 8:00 PM".to_string(),
            hours_weekend: "Sunday: By Appointment Only".to_string(),
        }
    }

    fn overlay(self, o: ContactOverrides) -> Self {
        ContactContent {
            address: o.address.unwrap_or(self.address),
            phone1: o.phone1.unwrap_or(self.phone1),
            phone2: o.phone2.unwrap_or(self.phone2),
            email1: o.email1.unwrap_or(self.email1),
            email2: o.email2.unwrap_or(self.email2),
            whatsapp: o.whatsapp.unwrap_or(self.whatsapp),
            hours_weekday: o.hours_weekday.unwrap_or(self.hours_weekday),
            hours_weekend: o.hours_weekend.unwrap_or(self.hours_weekend),
        }
    }
}

// Footer

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterContent {
    pub brand: String,
    pub brand_spans: TitleSpans,
    pub blurb: String,
    pub copyright: String,
    pub instagram_url: String,
    pub facebook_url: String,
    pub youtube_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FooterOverrides {
    #[serde(default, deserialize_with = "lenient")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub blurb: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub copyright: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub instagram_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub facebook_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub youtube_url: Option<String>,
}

impl SectionContent for FooterContent {
    const KEY: SectionKey = SectionKey::Footer;
    type Overrides = FooterOverrides;

    fn defaults() -> Self {
        let brand = "GlamourStudio".to_string();
        FooterContent {
            brand_spans: split_title(&brand),
            brand,
            blurb: "Transforming beauty with expertise and elegance. Your trusted destination for \
                professional bridal and party makeup."
                .to_string(),
            copyright: "© 2025 Glamour Studio. All rights reserved.".to_string(),
            instagram_url: "#".to_string(),
            facebook_url: "#".to_string(),
            youtube_url: "#".to_string(),
        }
    }

    fn overlay(self, o: FooterOverrides) -> Self {
        let brand = o.brand.unwrap_or(self.brand);
        FooterContent {
            brand_spans: split_title(&brand),
            brand,
            blurb: o.blurb.unwrap_or(self.blurb),
            copyright: o.copyright.unwrap_or(self.copyright),
            instagram_url: o.instagram_url.unwrap_or(self.instagram_url),
            facebook_url: o.facebook_url.unwrap_or(self.facebook_url),
            youtube_url: o.youtube_url.unwrap_or(self.youtube_url),
        }
    }
}
