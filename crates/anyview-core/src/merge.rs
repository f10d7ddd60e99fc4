//! Pinned/regular list merge and de-duplication.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::*;

/// Anything shown in a list: identified by `(space_id, id)` and searchable
/// by name and, for objects, snippet.
pub trait Listable {
    fn space_id(&self) -> &str;
    fn id(&self) -> &str;
    fn name(&self) -> &str;

    fn snippet(&self) -> Option<&str> {
        None
    }

    fn identity(&self) -> (&str, &str) {
        (self.space_id(), self.id())
    }
}

impl Listable for DisplayObject {
    fn space_id(&self) -> &str {
        &self.space_id
    }
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn snippet(&self) -> Option<&str> {
        Some(self.snippet.as_str()).filter(|s| !s.is_empty())
    }
}

impl Listable for DisplayType {
    fn space_id(&self) -> &str {
        &self.space_id
    }
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Listable for DisplayMember {
    fn space_id(&self) -> &str {
        &self.space_id
    }
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// Spaces are their own scope.
impl Listable for DisplaySpace {
    fn space_id(&self) -> &str {
        &self.id
    }
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

/// Property definitions carry no space; they are identified by id alone.
impl Listable for DisplayProperty {
    fn space_id(&self) -> &str {
        ""
    }
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Listable for DisplayEntity {
    fn space_id(&self) -> &str {
        match self {
            Self::Object(o) => o.space_id(),
            Self::Type(t) => t.space_id(),
            Self::Member(m) => m.space_id(),
            Self::Property(p) => p.space_id(),
            Self::Space(s) => s.space_id(),
        }
    }

    fn id(&self) -> &str {
        match self {
            Self::Object(o) => o.id(),
            Self::Type(t) => t.id(),
            Self::Member(m) => m.id(),
            Self::Property(p) => p.id(),
            Self::Space(s) => s.id(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Object(o) => o.name(),
            Self::Type(t) => t.name(),
            Self::Member(m) => m.name(),
            Self::Property(p) => p.name(),
            Self::Space(s) => s.name(),
        }
    }

    fn snippet(&self) -> Option<&str> {
        match self {
            Self::Object(o) => o.snippet(),
            _ => None,
        }
    }
}

/// Fields the search text is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchFields {
    /// Space views.
    #[default]
    Name,
    /// Global object search.
    NameAndSnippet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedList<T> {
    pub pinned: Vec<T>,
    pub regular: Vec<T>,
}

impl<T> MergedList<T> {
    pub fn len(&self) -> usize {
        self.pinned.len() + self.regular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.regular.is_empty()
    }
}

fn matches_search<T: Listable>(item: &T, needle: &str, fields: MatchFields) -> bool {
    if needle.is_empty() || item.name().to_lowercase().contains(needle) {
        return true;
    }
    fields == MatchFields::NameAndSnippet
        && item
            .snippet()
            .is_some_and(|s| s.to_lowercase().contains(needle))
}

/// Split a page into pinned and regular groups.
///
/// Pinned candidates are filtered by `search_text`; regular items that are
/// pinned (by `(space_id, id)`, whether or not they match the search) are
/// dropped, then the rest is filtered the same way. Input order is kept in
/// both groups and every identity appears at most once across the result.
pub fn merge_lists<T: Listable + Clone>(
    pinned: &[T],
    regular: &[T],
    search_text: &str,
    fields: MatchFields,
) -> MergedList<T> {
    let needle = search_text.to_lowercase();
    let pinned_ids: HashSet<(&str, &str)> = pinned.iter().map(Listable::identity).collect();

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let pinned_out = pinned
        .iter()
        .filter(|item| seen.insert(item.identity()))
        .filter(|item| matches_search(*item, &needle, fields))
        .cloned()
        .collect();

    let regular_out = regular
        .iter()
        .filter(|item| !pinned_ids.contains(&item.identity()))
        .filter(|item| seen.insert(item.identity()))
        .filter(|item| matches_search(*item, &needle, fields))
        .cloned()
        .collect();

    MergedList {
        pinned: pinned_out,
        regular: regular_out,
    }
}
