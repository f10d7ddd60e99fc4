//! Icon resolution.
//!
//! Turns the raw icon descriptor carried by an entity into a concrete icon
//! the rendering layer can draw. File icons need a lookup through a
//! [`FileResolver`]; a failed lookup downgrades to the kind's default glyph
//! and is never reported to the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults;
use crate::models::{ObjectLayout, RawIcon};
use crate::taxonomy::PropertyFormat;
use crate::traits::FileResolver;

/// Light/dark color pair applied to a glyph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint {
    pub light: String,
    pub dark: String,
}

impl Tint {
    /// Same color on both backgrounds.
    pub fn uniform(color: impl Into<String>) -> Self {
        let color = color.into();
        Self {
            light: color.clone(),
            dark: color,
        }
    }

    /// Neutral grey used for built-in glyphs and fallbacks.
    pub fn neutral() -> Self {
        Self::uniform(defaults::NEUTRAL_TINT)
    }
}

/// Built-in glyphs shipped with the extension assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    Document,
    PersonCircle,
    Type,
    Space,
    Property(PropertyFormat),
}

impl Glyph {
    pub fn asset(&self) -> &'static str {
        match self {
            Self::Document => "icons/type/document.svg",
            Self::PersonCircle => "icons/type/person-circle.svg",
            Self::Type => "icons/type/extension-puzzle.svg",
            Self::Space => "icons/type/planet.svg",
            Self::Property(format) => format.glyph_asset(),
        }
    }
}

/// Where the pixels of an icon come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IconSource {
    Emoji(String),
    /// Downloadable URL or local path of an uploaded image.
    File(String),
    Glyph(Glyph),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconMask {
    Circle,
    RoundedRectangle,
    None,
}

/// Render-ready icon. Never carries the raw tagged union.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConcreteIcon {
    pub source: IconSource,
    pub mask: IconMask,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<Tint>,
}

impl ConcreteIcon {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Self {
            source: IconSource::Emoji(emoji.into()),
            mask: IconMask::None,
            tint: None,
        }
    }

    pub fn glyph(glyph: Glyph, mask: IconMask) -> Self {
        Self {
            source: IconSource::Glyph(glyph),
            mask,
            tint: Some(Tint::neutral()),
        }
    }

    /// Asset path when the icon is a built-in glyph.
    pub fn asset(&self) -> Option<&'static str> {
        match &self.source {
            IconSource::Glyph(glyph) => Some(glyph.asset()),
            _ => None,
        }
    }

    /// Same icon with a different mask.
    pub fn with_mask(mut self, mask: IconMask) -> Self {
        self.mask = mask;
        self
    }
}

/// Entity kind an icon is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Object,
    Type,
    Member,
    Space,
    Property(PropertyFormat),
}

/// Everything besides the raw icon that influences resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconContext {
    pub kind: EntityKind,
    /// Object layout; only meaningful for objects.
    pub layout: Option<ObjectLayout>,
}

impl IconContext {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind, layout: None }
    }

    pub fn object(layout: Option<ObjectLayout>) -> Self {
        Self {
            kind: EntityKind::Object,
            layout,
        }
    }

    /// Circular for members and person-like layouts, rounded otherwise.
    /// Property glyphs are never masked.
    pub fn mask(&self) -> IconMask {
        match self.kind {
            EntityKind::Member => IconMask::Circle,
            EntityKind::Property(_) => IconMask::None,
            _ if self.layout.as_ref().is_some_and(ObjectLayout::is_person) => IconMask::Circle,
            _ => IconMask::RoundedRectangle,
        }
    }

    pub fn default_glyph(&self) -> Glyph {
        match self.kind {
            EntityKind::Object => Glyph::Document,
            EntityKind::Type => Glyph::Type,
            EntityKind::Member => Glyph::PersonCircle,
            EntityKind::Space => Glyph::Space,
            EntityKind::Property(format) => Glyph::Property(format),
        }
    }

    /// Default glyph with neutral tint.
    pub fn fallback(&self) -> ConcreteIcon {
        ConcreteIcon::glyph(self.default_glyph(), self.mask())
    }
}

/// Resolve a raw icon to a concrete one.
///
/// File lookups that fail fall back to the default glyph; this function
/// has no error path.
pub async fn resolve_icon(
    raw: &RawIcon,
    ctx: &IconContext,
    files: &dyn FileResolver,
) -> ConcreteIcon {
    match raw {
        RawIcon::File { file } if !file.is_empty() => match files.resolve_file(file).await {
            Ok(location) => ConcreteIcon {
                source: IconSource::File(location),
                mask: ctx.mask(),
                tint: None,
            },
            Err(e) => {
                debug!(
                    component = "icon",
                    file_id = %file,
                    error = %e,
                    "File icon unavailable, using default glyph"
                );
                ctx.fallback()
            }
        },
        other => resolve_icon_offline(other, ctx),
    }
}

/// Resolve without a file collaborator; file icons take the fallback path.
pub fn resolve_icon_offline(raw: &RawIcon, ctx: &IconContext) -> ConcreteIcon {
    match raw {
        RawIcon::Emoji { emoji } if !emoji.is_empty() => ConcreteIcon::emoji(emoji.clone()),
        _ => ctx.fallback(),
    }
}
