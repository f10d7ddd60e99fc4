//! Collaborator traits.
//!
//! The core never performs I/O. Fetching pages, looking up referenced
//! objects, resolving uploaded icon files and persisting pins are reached
//! through these traits so concrete backends stay pluggable and testable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{RawEntity, RawObject};
use crate::pinned::PinnedRef;

// =============================================================================
// PAGE SOURCE
// =============================================================================

/// Entity listing a page can be requested for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageKind {
    Spaces,
    Objects,
    Types,
    Members,
    Properties,
    /// Templates of one type; `scope_id` is still the space.
    Templates { type_id: String },
}

/// Request for one page of raw entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: PageKind,
    /// Space id; ignored for [`PageKind::Spaces`].
    pub scope_id: String,
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(kind: PageKind, scope_id: impl Into<String>, offset: usize, limit: usize) -> Self {
        Self {
            kind,
            scope_id: scope_id.into(),
            offset,
            limit,
        }
    }

    /// Request for page `page` (zero-based) of `limit` items.
    pub fn page(kind: PageKind, scope_id: impl Into<String>, page: usize, limit: usize) -> Self {
        Self::new(kind, scope_id, page * limit, limit)
    }
}

/// One page of raw entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
        }
    }
}

/// Fetches pages of raw entities. Offset bookkeeping belongs to the caller.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, req: PageRequest) -> Result<Page<RawEntity>>;
}

// =============================================================================
// OBJECT SOURCE
// =============================================================================

/// Looks up single objects, used for pinned refs and hydration fan-out.
#[async_trait]
pub trait ObjectSource: Send + Sync {
    async fn get_object(&self, space_id: &str, object_id: &str) -> Result<RawObject>;
}

// =============================================================================
// FILE RESOLVER
// =============================================================================

/// Resolves an uploaded file id to a downloadable URL or local path.
///
/// Retries, if any, belong to the implementation.
#[async_trait]
pub trait FileResolver: Send + Sync {
    async fn resolve_file(&self, file_id: &str) -> Result<String>;
}

/// Resolver for offline mapping; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFileResolver;

#[async_trait]
impl FileResolver for NoFileResolver {
    async fn resolve_file(&self, file_id: &str) -> Result<String> {
        Err(Error::IconResolution(format!(
            "no file resolver configured for {}",
            file_id
        )))
    }
}

// =============================================================================
// PINNED STORE
// =============================================================================

/// Ordered set of pinned entity references for one namespace.
///
/// Capacity limits, if any, are enforced here rather than by the mapper.
#[async_trait]
pub trait PinnedStore: Send + Sync {
    /// Pinned refs in insertion order.
    async fn list(&self) -> Result<Vec<PinnedRef>>;

    /// Pin a ref; pinning an already pinned ref is a no-op.
    async fn add(&self, space_id: &str, object_id: &str) -> Result<()>;

    /// Unpin a ref; unpinning an absent ref is a no-op.
    async fn remove(&self, space_id: &str, object_id: &str) -> Result<()>;

    async fn contains(&self, space_id: &str, object_id: &str) -> Result<bool> {
        Ok(self
            .list()
            .await?
            .iter()
            .any(|p| p.matches(space_id, object_id)))
    }
}
