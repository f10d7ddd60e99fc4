//! Labels and small text helpers for list views.
//!
//! The sort field is always passed in by the caller; nothing here reads a
//! user preference.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::models::{DisplayObject, PropertyValue};

/// Field a list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedDate,
    #[default]
    LastModifiedDate,
    LastOpenedDate,
    Name,
}

impl SortField {
    /// Wire value used in search sort options.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedDate => "created_date",
            Self::LastModifiedDate => "last_modified_date",
            Self::LastOpenedDate => "last_opened_date",
            Self::Name => "name",
        }
    }

    /// Date property this sort reads, if it is a date sort.
    pub fn property_key(&self) -> Option<&'static str> {
        match self {
            Self::CreatedDate => Some(defaults::PROP_CREATED_DATE),
            Self::LastModifiedDate => Some(defaults::PROP_LAST_MODIFIED_DATE),
            Self::LastOpenedDate => Some(defaults::PROP_LAST_OPENED_DATE),
            Self::Name => None,
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "created_date" => Ok(Self::CreatedDate),
            "last_modified_date" => Ok(Self::LastModifiedDate),
            "last_opened_date" => Ok(Self::LastOpenedDate),
            "name" => Ok(Self::Name),
            other => Err(crate::error::Error::InvalidInput(format!(
                "unknown sort field: {}",
                other
            ))),
        }
    }
}

/// Tooltip label for the date shown next to a list item.
pub fn date_label(sort: SortField) -> &'static str {
    match sort {
        SortField::CreatedDate => "Created Date",
        SortField::LastModifiedDate => "Last Modified Date",
        SortField::LastOpenedDate => "Last Opened Date",
        SortField::Name => "Date",
    }
}

/// Compact form of [`date_label`].
pub fn short_date_label(sort: SortField) -> &'static str {
    match sort {
        SortField::CreatedDate => "Created",
        SortField::LastModifiedDate => "Modified",
        SortField::LastOpenedDate => "Opened",
        SortField::Name => "Date",
    }
}

impl DisplayObject {
    /// Timestamp matching `sort`, when the object was hydrated and has it.
    pub fn date_for(&self, sort: SortField) -> Option<&str> {
        let key = sort.property_key()?;
        match &self.property(key)?.value {
            Some(PropertyValue::Date(date)) => Some(date.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluralOptions<'a> {
    pub suffix: &'a str,
    /// Prefix the count: "3 objects" rather than "objects".
    pub with_number: bool,
}

impl Default for PluralOptions<'_> {
    fn default() -> Self {
        Self {
            suffix: "s",
            with_number: false,
        }
    }
}

pub fn pluralize(count: usize, noun: &str, opts: PluralOptions<'_>) -> String {
    let word = if count == 1 {
        noun.to_string()
    } else {
        format!("{}{}", noun, opts.suffix)
    };
    if opts.with_number {
        format!("{} {}", count, word)
    } else {
        word
    }
}

/// Human name of a member role.
pub fn format_member_role(role: &str) -> String {
    match role {
        "reader" | "Reader" => "Viewer".to_string(),
        "writer" | "Writer" => "Editor".to_string(),
        "owner" | "Owner" => "Owner".to_string(),
        "no_permissions" | "NoPermissions" => "No Permissions".to_string(),
        other => title_case(other),
    }
}

fn title_case(s: &str) -> String {
    s.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Section heading: search results while searching, the whole view otherwise.
pub fn section_title(search_text: &str, view: &str) -> String {
    if search_text.trim().is_empty() {
        format!("All {}", view)
    } else {
        "Search Results".to_string()
    }
}
