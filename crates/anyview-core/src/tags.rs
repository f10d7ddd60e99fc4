//! Tag color palette and tag normalization.
//!
//! Color is cosmetic: tokens outside the palette pass through unchanged
//! (they are assumed to be resolved values already, such as hex strings).

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::models::RawTag;

/// Named colors the API uses for tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Grey,
    Yellow,
    Orange,
    Red,
    Pink,
    Purple,
    Blue,
    Ice,
    Teal,
    Lime,
}

impl TagColor {
    pub const ALL: [TagColor; 10] = [
        Self::Grey,
        Self::Yellow,
        Self::Orange,
        Self::Red,
        Self::Pink,
        Self::Purple,
        Self::Blue,
        Self::Ice,
        Self::Teal,
        Self::Lime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Blue => "blue",
            Self::Ice => "ice",
            Self::Teal => "teal",
            Self::Lime => "lime",
        }
    }

    /// Canonical display hex.
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Grey => "#b6b6b6",
            Self::Yellow => "#ecd91b",
            Self::Orange => "#ffb522",
            Self::Red => "#f55522",
            Self::Pink => "#e51ca0",
            Self::Purple => "#ab50cc",
            Self::Blue => "#3e58eb",
            Self::Ice => "#2aa7ee",
            Self::Teal => "#0fc8ba",
            Self::Lime => "#5dd400",
        }
    }

    /// Palette entry whose hex matches, ignoring case.
    pub fn from_hex(hex: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.hex().eq_ignore_ascii_case(hex))
    }

    /// Palette entry for a color token, ignoring case and surrounding space.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(token))
    }
}

impl std::fmt::Display for TagColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    /// Resolved display color (palette hex or pass-through value).
    pub color: String,
}

impl Tag {
    /// Palette token for this tag's color, when it is a palette hex.
    pub fn color_name(&self) -> Option<&'static str> {
        TagColor::from_hex(&self.color).map(|c| c.as_str())
    }
}

/// Map a color token to its display value.
pub fn normalize_color(token: &str) -> String {
    match TagColor::from_token(token) {
        Some(color) => color.hex().to_string(),
        None => token.to_string(),
    }
}

pub fn normalize_tag(raw: RawTag) -> Tag {
    let name = if raw.name.is_empty() {
        defaults::UNTITLED.to_string()
    } else {
        raw.name
    };
    Tag {
        id: raw.id,
        key: raw.key,
        name,
        color: normalize_color(&raw.color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, color: &str) -> RawTag {
        RawTag {
            id: "tag1".to_string(),
            key: None,
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn test_empty_name_and_palette_color() {
        let tag = normalize_tag(raw("", "purple"));
        assert_eq!(tag.name, "Untitled");
        assert_eq!(tag.color, "#ab50cc");
    }

    #[test]
    fn test_unknown_token_passes_through() {
        let tag = normalize_tag(raw("X", "#123456"));
        assert_eq!(tag.name, "X");
        assert_eq!(tag.color, "#123456");
    }

    #[test]
    fn test_empty_color_passes_through() {
        assert_eq!(normalize_color(""), "");
    }

    #[test]
    fn test_token_lookup_ignores_case() {
        assert_eq!(normalize_color("Lime"), "#5dd400");
        assert_eq!(normalize_color(" ice "), "#2aa7ee");
    }

    #[test]
    fn test_palette_hex_round_trip() {
        for color in TagColor::ALL {
            assert_eq!(TagColor::from_hex(color.hex()), Some(color));
            assert_eq!(TagColor::from_token(color.as_str()), Some(color));
        }
        assert_eq!(TagColor::from_hex("#AB50CC"), Some(TagColor::Purple));
        assert_eq!(TagColor::from_hex("#000000"), None);
    }

    #[test]
    fn test_color_name() {
        let tag = normalize_tag(raw("Done", "teal"));
        assert_eq!(tag.color_name(), Some("teal"));
        let tag = normalize_tag(raw("Custom", "#010203"));
        assert_eq!(tag.color_name(), None);
    }

    #[test]
    fn test_id_and_key_pass_through() {
        let mut input = raw("A", "red");
        input.key = Some("status_done".to_string());
        let tag = normalize_tag(input);
        assert_eq!(tag.id, "tag1");
        assert_eq!(tag.key.as_deref(), Some("status_done"));
    }
}
