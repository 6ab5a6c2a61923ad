use serde::Serialize;

/// Icons the public site knows how to draw. Stored content refers to them
/// by name; lookup is total and falls back to [`Icon::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Icon {
    Crown,
    Gem,
    Palette,
    Scissors,
    Sparkles,
    Star,
    Heart,
    Award,
    Users,
}

impl Icon {
    pub const DEFAULT: Icon = Icon::Sparkles;

    pub const ALL: [Icon; 9] = [
        Icon::Crown,
        Icon::Gem,
        Icon::Palette,
        Icon::Scissors,
        Icon::Sparkles,
        Icon::Star,
        Icon::Heart,
        Icon::Award,
        Icon::Users,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Icon::Crown => "Crown",
            Icon::Gem => "Gem",
            Icon::Palette => "Palette",
            Icon::Scissors => "Scissors",
            Icon::Sparkles => "Sparkles",
            Icon::Star => "Star",
            Icon::Heart => "Heart",
            Icon::Award => "Award",
            Icon::Users => "Users",
        }
    }

    /// Case-insensitive lookup of a stored icon name.
    pub fn from_name(name: Option<&str>) -> Icon {
        let Some(name) = name.map(str::trim) else {
            return Icon::DEFAULT;
        };
        Icon::ALL
            .into_iter()
            .find(|icon| icon.name().eq_ignore_ascii_case(name))
            .unwrap_or(Icon::DEFAULT)
    }
}
