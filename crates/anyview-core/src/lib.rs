//! # anyview-core
//!
//! Core types, traits, and normalization logic for anyview.
//!
//! This crate turns raw entities from the local knowledge-base REST API into
//! display-ready records and merges pinned and regular lists. It performs no
//! I/O itself; fetching, file lookup and pin persistence are reached through
//! the collaborator traits in [`traits`].

pub mod defaults;
pub mod entries;
pub mod error;
pub mod icon;
pub mod labels;
pub mod logging;
pub mod mapper;
pub mod merge;
pub mod models;
pub mod pinned;
pub mod tags;
pub mod taxonomy;
pub mod traits;

// Re-export commonly used types at crate root
pub use entries::{
    build_create_request, build_property_entries, editable_properties, validate_form,
    CreateObjectDraft, CreateObjectRequest, EntryValue, FieldError, FormValue, FormValues,
    PropertyEntry,
};
pub use error::{Error, Result};
pub use icon::{
    resolve_icon, resolve_icon_offline, ConcreteIcon, EntityKind, Glyph, IconContext, IconMask,
    IconSource, Tint,
};
pub use labels::{
    date_label, format_member_role, pluralize, section_title, short_date_label, PluralOptions,
    SortField,
};
pub use mapper::{map_properties, map_property, Hydration, Mapper};
pub use merge::{merge_lists, Listable, MatchFields, MergedList};
pub use models::*;
pub use pinned::{MemoryPinnedStore, PinnedNamespace, PinnedRef};
pub use tags::{normalize_color, normalize_tag, Tag, TagColor};
pub use taxonomy::{icon_for_format, icon_for_format_str, PropertyFormat};
pub use traits::*;
