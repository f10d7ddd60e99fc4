//! Property format taxonomy.
//!
//! The fixed set of value kinds a property can hold, the glyph each one is
//! shown with, and the input rule the create form applies to it. Adding a
//! format is an enum change; an unknown wire value is an
//! [`Error::UnsupportedFormat`], never a silent drop.

use serde::{Deserialize, Serialize};

use crate::entries::{parse_form_date, FormValue};
use crate::error::{Error, Result};
use crate::icon::{ConcreteIcon, Glyph, IconMask, IconSource, Tint};

/// Value kind of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyFormat {
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    #[serde(alias = "file")]
    Files,
    Checkbox,
    Url,
    Email,
    Phone,
    #[serde(alias = "object")]
    Objects,
}

impl PropertyFormat {
    /// Every format, in taxonomy order.
    pub const ALL: [PropertyFormat; 11] = [
        Self::Text,
        Self::Number,
        Self::Select,
        Self::MultiSelect,
        Self::Date,
        Self::Files,
        Self::Checkbox,
        Self::Url,
        Self::Email,
        Self::Phone,
        Self::Objects,
    ];

    /// Wire name, also the JSON key of the matching value slot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Date => "date",
            Self::Files => "files",
            Self::Checkbox => "checkbox",
            Self::Url => "url",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Objects => "objects",
        }
    }

    /// Asset path of the glyph shown for this format.
    pub fn glyph_asset(&self) -> &'static str {
        match self {
            Self::Text => "icons/property/text.svg",
            Self::Number => "icons/property/number.svg",
            Self::Select => "icons/property/select.svg",
            Self::MultiSelect => "icons/property/multiSelect.svg",
            Self::Date => "icons/property/date.svg",
            Self::Files => "icons/property/file.svg",
            Self::Checkbox => "icons/property/checkbox.svg",
            Self::Url => "icons/property/url.svg",
            Self::Email => "icons/property/email.svg",
            Self::Phone => "icons/property/phone.svg",
            Self::Objects => "icons/property/object.svg",
        }
    }

    /// Check a raw form value against this format's input rule.
    ///
    /// Returns a user-facing message when the value is set but unacceptable.
    /// Empty values always pass; omission is decided by entry assembly.
    pub fn validate(&self, value: &FormValue) -> Option<String> {
        if value.is_unset() {
            return None;
        }
        match (self, value) {
            (Self::Number, FormValue::Number(n)) if n.is_finite() => None,
            (Self::Number, FormValue::Text(s)) if s.trim().parse::<f64>().is_ok() => None,
            (Self::Number, _) => Some("Value must be a valid number".to_string()),
            (Self::Email, FormValue::Text(s)) => match s.trim().split_once('@') {
                Some((local, domain)) if !local.is_empty() && !domain.is_empty() => None,
                _ => Some("Value must be a valid email address".to_string()),
            },
            (Self::Url, FormValue::Text(s)) if s.contains("://") => None,
            (Self::Url, _) => Some("Value must be a URL with a scheme".to_string()),
            (Self::Date, FormValue::Date(_)) => None,
            (Self::Date, FormValue::Text(s)) if parse_form_date(s).is_some() => None,
            (Self::Date, _) => Some("Value must be a valid date".to_string()),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PropertyFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "select" => Ok(Self::Select),
            "multi_select" => Ok(Self::MultiSelect),
            "date" => Ok(Self::Date),
            "files" | "file" => Ok(Self::Files),
            "checkbox" => Ok(Self::Checkbox),
            "url" => Ok(Self::Url),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "objects" | "object" => Ok(Self::Objects),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Icon for a property format: its glyph with the neutral tint, no mask.
pub fn icon_for_format(format: PropertyFormat) -> ConcreteIcon {
    ConcreteIcon {
        source: IconSource::Glyph(Glyph::Property(format)),
        mask: IconMask::None,
        tint: Some(Tint::neutral()),
    }
}

/// Parse a wire format name and return its icon.
pub fn icon_for_format_str(format: &str) -> Result<ConcreteIcon> {
    Ok(icon_for_format(format.parse()?))
}
