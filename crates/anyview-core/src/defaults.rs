//! Centralized default constants for anyview.
//!
//! Both crates reference these constants instead of defining their own magic
//! values. Organized by domain area.

// =============================================================================
// DISPLAY
// =============================================================================

/// Name shown for entities whose raw name is empty.
pub const UNTITLED: &str = "Untitled";

/// Neutral tint applied to built-in glyphs.
pub const NEUTRAL_TINT: &str = "grey";

// =============================================================================
// API
// =============================================================================

/// Base URL of the local REST API.
pub const API_URL: &str = "http://localhost:31009/v1";

/// Value sent in the API version header.
pub const API_VERSION: &str = "2025-04-22";

/// Header carrying the API version.
pub const API_VERSION_HEADER: &str = "Anytype-Version";

/// Request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list endpoints.
pub const PAGE_LIMIT: usize = 50;

/// Largest page size the API accepts.
pub const PAGE_LIMIT_MAX: usize = 1000;

// =============================================================================
// ICONS
// =============================================================================

/// Width requested for gateway-rendered file icons.
pub const ICON_WIDTH: u32 = 64;

// =============================================================================
// PINNING
// =============================================================================

/// Capacity used by the bounded pinned-store variant.
pub const MAX_PINNED_OBJECTS: usize = 5;

/// Prefix for pinned-store namespace keys.
pub const PINNED_KEY_PREFIX: &str = "pinned_objects_";

// =============================================================================
// PROPERTY KEYS
// =============================================================================

pub const PROP_DESCRIPTION: &str = "description";
pub const PROP_TYPE: &str = "type";
pub const PROP_ADDED_DATE: &str = "added_date";
pub const PROP_CREATED_DATE: &str = "created_date";
pub const PROP_CREATOR: &str = "creator";
pub const PROP_LAST_MODIFIED_DATE: &str = "last_modified_date";
pub const PROP_LAST_MODIFIED_BY: &str = "last_modified_by";
pub const PROP_LAST_OPENED_DATE: &str = "last_opened_date";
pub const PROP_LINKS: &str = "links";
pub const PROP_BACKLINKS: &str = "backlinks";
pub const PROP_SOURCE: &str = "source";

/// System-managed properties that are never edited through the create form.
pub const BUNDLED_PROPERTY_KEYS: &[&str] = &[
    PROP_DESCRIPTION,
    PROP_TYPE,
    PROP_ADDED_DATE,
    PROP_CREATED_DATE,
    PROP_CREATOR,
    PROP_LAST_MODIFIED_DATE,
    PROP_LAST_MODIFIED_BY,
    PROP_LAST_OPENED_DATE,
    PROP_LINKS,
    PROP_BACKLINKS,
];

// =============================================================================
// TYPE KEYS
// =============================================================================

pub const TYPE_KEY_BOOKMARK: &str = "ot-bookmark";
pub const TYPE_KEY_NOTE: &str = "ot-note";
