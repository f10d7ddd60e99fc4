//! Write-path assembly of property entries.
//!
//! Raw form values are turned into typed property entries for the create
//! and update endpoints. Values that are not set are omitted entirely. A
//! value that cannot be coerced to its property's format is skipped with a
//! warning so the remaining fields are still submitted.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::defaults;
use crate::error::{Error, Result};
use crate::models::{DisplayProperty, RawIcon};
use crate::taxonomy::PropertyFormat;

/// Raw value captured by a form field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Selected tag ids, or object/file ids.
    List(Vec<String>),
    Date(DateTime<Utc>),
}

impl FormValue {
    /// True for values that mean "not set": empty, blank text, `false`, or
    /// an empty list.
    pub fn is_unset(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Bool(b) => !b,
            Self::List(items) => items.is_empty(),
            Self::Number(_) | Self::Date(_) => false,
        }
    }
}

/// Form values keyed by property key.
pub type FormValues = HashMap<String, FormValue>;

/// Parse a date typed into a form: RFC 3339, or `YYYY-MM-DD` taken as
/// midnight UTC.
pub fn parse_form_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn format_date(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Typed value of a property entry; serialized under the format's key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryValue {
    Text(String),
    Number(f64),
    /// Tag id.
    Select(String),
    MultiSelect(Vec<String>),
    /// RFC 3339 timestamp.
    Date(String),
    Files(Vec<String>),
    Checkbox(bool),
    Url(String),
    Email(String),
    Phone(String),
    Objects(Vec<String>),
}

impl EntryValue {
    pub fn format(&self) -> PropertyFormat {
        match self {
            Self::Text(_) => PropertyFormat::Text,
            Self::Number(_) => PropertyFormat::Number,
            Self::Select(_) => PropertyFormat::Select,
            Self::MultiSelect(_) => PropertyFormat::MultiSelect,
            Self::Date(_) => PropertyFormat::Date,
            Self::Files(_) => PropertyFormat::Files,
            Self::Checkbox(_) => PropertyFormat::Checkbox,
            Self::Url(_) => PropertyFormat::Url,
            Self::Email(_) => PropertyFormat::Email,
            Self::Phone(_) => PropertyFormat::Phone,
            Self::Objects(_) => PropertyFormat::Objects,
        }
    }
}

/// Property link with value, as sent to the API:
/// `{"key": "due", "date": "2025-04-22T00:00:00Z"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub key: String,
    #[serde(flatten)]
    pub value: EntryValue,
}

fn mismatch(key: &str, format: PropertyFormat, value: &FormValue) -> Error {
    Error::InvalidInput(format!(
        "property {} expects a {} value, got {:?}",
        key, format, value
    ))
}

/// Coerce one set form value to its property's format.
fn coerce(key: &str, format: PropertyFormat, value: &FormValue) -> Result<EntryValue> {
    let entry = match (format, value) {
        (PropertyFormat::Text, FormValue::Text(s)) => EntryValue::Text(s.clone()),
        (PropertyFormat::Url, FormValue::Text(s)) => EntryValue::Url(s.trim().to_string()),
        (PropertyFormat::Email, FormValue::Text(s)) => EntryValue::Email(s.trim().to_string()),
        (PropertyFormat::Phone, FormValue::Text(s)) => EntryValue::Phone(s.trim().to_string()),
        (PropertyFormat::Number, FormValue::Number(n)) if n.is_finite() => EntryValue::Number(*n),
        (PropertyFormat::Number, FormValue::Text(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => EntryValue::Number(n),
            _ => return Err(mismatch(key, format, value)),
        },
        (PropertyFormat::Select, FormValue::Text(id)) => EntryValue::Select(id.clone()),
        (PropertyFormat::MultiSelect, FormValue::List(ids)) => EntryValue::MultiSelect(ids.clone()),
        (PropertyFormat::MultiSelect, FormValue::Text(id)) => EntryValue::MultiSelect(vec![id.clone()]),
        (PropertyFormat::Date, FormValue::Date(dt)) => EntryValue::Date(format_date(dt)),
        (PropertyFormat::Date, FormValue::Text(s)) => match parse_form_date(s) {
            Some(dt) => EntryValue::Date(format_date(&dt)),
            None => {
                return Err(Error::InvalidDateValue {
                    key: key.to_string(),
                    value: s.clone(),
                })
            }
        },
        (PropertyFormat::Files, FormValue::List(ids)) => EntryValue::Files(ids.clone()),
        (PropertyFormat::Files, FormValue::Text(id)) => EntryValue::Files(vec![id.clone()]),
        (PropertyFormat::Objects, FormValue::List(ids)) => EntryValue::Objects(ids.clone()),
        (PropertyFormat::Objects, FormValue::Text(id)) => EntryValue::Objects(vec![id.clone()]),
        (PropertyFormat::Checkbox, FormValue::Bool(b)) => EntryValue::Checkbox(*b),
        _ => return Err(mismatch(key, format, value)),
    };
    Ok(entry)
}

/// Build one typed entry per property definition whose form value is set.
///
/// Entries follow the order of `defs`. Unset values are omitted; values
/// that cannot be coerced are logged and skipped.
pub fn build_property_entries(values: &FormValues, defs: &[DisplayProperty]) -> Vec<PropertyEntry> {
    let mut entries = Vec::new();
    for def in defs {
        let Some(value) = values.get(&def.key) else {
            continue;
        };
        if value.is_unset() {
            continue;
        }
        match coerce(&def.key, def.format, value) {
            Ok(value) => entries.push(PropertyEntry {
                key: def.key.clone(),
                value,
            }),
            Err(e) => warn!(
                component = "entries",
                property_key = %def.key,
                format = %def.format,
                error = %e,
                "Skipping property value"
            ),
        }
    }
    debug!(component = "entries", result_count = entries.len(), "Assembled property entries");
    entries
}

/// Property definitions a user may fill in; system-managed ones are dropped.
pub fn editable_properties(defs: &[DisplayProperty]) -> Vec<DisplayProperty> {
    defs.iter()
        .filter(|d| !defaults::BUNDLED_PROPERTY_KEYS.contains(&d.key.as_str()))
        .cloned()
        .collect()
}

/// Problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub key: String,
    pub message: String,
}

impl FieldError {
    fn new(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Apply each property format's input rule to the form values.
pub fn validate_form(values: &FormValues, defs: &[DisplayProperty]) -> Vec<FieldError> {
    defs.iter()
        .filter_map(|def| {
            let value = values.get(&def.key)?;
            def.format
                .validate(value)
                .map(|message| FieldError::new(&def.key, message))
        })
        .collect()
}

/// Everything the create form collects.
#[derive(Debug, Clone, Default)]
pub struct CreateObjectDraft {
    pub name: String,
    /// Single emoji, or empty for none.
    pub icon: String,
    pub description: String,
    /// Markdown body.
    pub body: String,
    /// Bookmark URL.
    pub source: String,
    pub template_id: Option<String>,
    pub values: FormValues,
}

/// Create-object payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateObjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<RawIcon>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub type_key: String,
    pub properties: Vec<PropertyEntry>,
}

fn is_pictographic(c: char) -> bool {
    matches!(c,
        '\u{1F000}'..='\u{1FAFF}'
        | '\u{2600}'..='\u{27BF}'
        | '\u{2300}'..='\u{23FF}'
        | '\u{2190}'..='\u{21FF}'
        | '\u{2B00}'..='\u{2BFF}'
        | '\u{3030}' | '\u{303D}' | '\u{3297}' | '\u{3299}'
        | '\u{00A9}' | '\u{00AE}' | '\u{2122}')
}

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

/// True when `s` is exactly one emoji, including ZWJ sequences, skin tone
/// modifiers and flags.
pub fn is_single_emoji(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !is_pictographic(first) {
        return false;
    }
    let mut after_joiner = false;
    let mut flag_paired = false;
    for c in chars {
        match c {
            '\u{200D}' if !after_joiner => after_joiner = true,
            '\u{FE0F}' | '\u{20E3}' | '\u{1F3FB}'..='\u{1F3FF}' => {}
            c if is_regional_indicator(first) && is_regional_indicator(c) && !flag_paired => {
                flag_paired = true
            }
            c if after_joiner && is_pictographic(c) => after_joiner = false,
            _ => return false,
        }
    }
    !after_joiner
}

fn draft_errors(draft: &CreateObjectDraft, type_key: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let nameless = type_key == defaults::TYPE_KEY_BOOKMARK || type_key == defaults::TYPE_KEY_NOTE;
    if !nameless && draft.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    let icon = draft.icon.trim();
    if !icon.is_empty() && !is_single_emoji(icon) {
        errors.push(FieldError::new("icon", "Icon must be a single emoji"));
    }
    if type_key == defaults::TYPE_KEY_BOOKMARK && draft.source.trim().is_empty() {
        errors.push(FieldError::new(defaults::PROP_SOURCE, "Source is required"));
    }
    errors
}

/// Validate a draft and assemble the create-object payload.
///
/// Name, icon and source problems reject the draft. Per-property problems
/// follow entry assembly and only drop the offending field.
pub fn build_create_request(
    draft: CreateObjectDraft,
    type_key: &str,
    defs: &[DisplayProperty],
) -> Result<CreateObjectRequest> {
    let errors = draft_errors(&draft, type_key);
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(|e| format!("{}: {}", e.key, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::InvalidInput(message));
    }

    let form_defs: Vec<DisplayProperty> = editable_properties(defs)
        .into_iter()
        .filter(|d| d.key != defaults::PROP_SOURCE)
        .collect();
    let mut properties = build_property_entries(&draft.values, &form_defs);

    let description = draft.description.trim();
    if !description.is_empty() {
        properties.push(PropertyEntry {
            key: defaults::PROP_DESCRIPTION.to_string(),
            value: EntryValue::Text(description.to_string()),
        });
    }
    let source = draft.source.trim();
    if !source.is_empty() {
        properties.push(PropertyEntry {
            key: defaults::PROP_SOURCE.to_string(),
            value: EntryValue::Url(source.to_string()),
        });
    }

    let icon = draft.icon.trim();
    Ok(CreateObjectRequest {
        name: draft.name.trim().to_string(),
        icon: (!icon.is_empty()).then(|| RawIcon::Emoji {
            emoji: icon.to_string(),
        }),
        body: draft.body,
        template_id: draft.template_id.filter(|t| !t.is_empty()),
        type_key: type_key.to_string(),
        properties,
    })
}
