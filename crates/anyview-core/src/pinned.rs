//! Pinned references and an in-memory pinned store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::defaults;
use crate::error::{Error, Result};
use crate::traits::PinnedStore;

/// Composite identity of a pinned entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedRef {
    pub space_id: String,
    pub object_id: String,
}

impl PinnedRef {
    pub fn new(space_id: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            object_id: object_id.into(),
        }
    }

    pub fn matches(&self, space_id: &str, object_id: &str) -> bool {
        self.space_id == space_id && self.object_id == object_id
    }
}

/// Separate pinned lists kept per view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PinnedNamespace {
    Spaces,
    GlobalSearch,
    /// One list per space and view (objects, types, members, ...).
    View { space_id: String, view: String },
}

impl PinnedNamespace {
    pub fn suffix(&self) -> String {
        match self {
            Self::Spaces => "spaces".to_string(),
            Self::GlobalSearch => "global_search".to_string(),
            Self::View { space_id, view } => format!("{}_{}", space_id, view),
        }
    }

    /// Key under which the list is persisted.
    pub fn storage_key(&self) -> String {
        format!("{}{}", defaults::PINNED_KEY_PREFIX, self.suffix())
    }
}

/// Pinned store kept in memory, optionally capacity-bounded.
#[derive(Debug, Default)]
pub struct MemoryPinnedStore {
    refs: Mutex<Vec<PinnedRef>>,
    capacity: Option<usize>,
}

impl MemoryPinnedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            refs: Mutex::new(Vec::new()),
            capacity: Some(capacity),
        }
    }

    pub fn from_refs(refs: Vec<PinnedRef>) -> Self {
        Self {
            refs: Mutex::new(refs),
            capacity: None,
        }
    }
}

/// Append `pin` to `refs` unless present; shared by store implementations.
pub fn insert_pin(refs: &mut Vec<PinnedRef>, pin: PinnedRef, capacity: Option<usize>) -> Result<bool> {
    if refs.contains(&pin) {
        return Ok(false);
    }
    if let Some(max) = capacity {
        if refs.len() >= max {
            return Err(Error::PinnedLimit(max));
        }
    }
    refs.push(pin);
    Ok(true)
}

#[async_trait]
impl PinnedStore for MemoryPinnedStore {
    async fn list(&self) -> Result<Vec<PinnedRef>> {
        Ok(self.refs.lock().await.clone())
    }

    async fn add(&self, space_id: &str, object_id: &str) -> Result<()> {
        let mut refs = self.refs.lock().await;
        if insert_pin(&mut refs, PinnedRef::new(space_id, object_id), self.capacity)? {
            debug!(component = "pinned", space_id, object_id, "Pinned");
        }
        Ok(())
    }

    async fn remove(&self, space_id: &str, object_id: &str) -> Result<()> {
        self.refs
            .lock()
            .await
            .retain(|p| !p.matches(space_id, object_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_keys() {
        assert_eq!(PinnedNamespace::Spaces.storage_key(), "pinned_objects_spaces");
        assert_eq!(
            PinnedNamespace::GlobalSearch.storage_key(),
            "pinned_objects_global_search"
        );
        let ns = PinnedNamespace::View {
            space_id: "sp1".to_string(),
            view: "types".to_string(),
        };
        assert_eq!(ns.storage_key(), "pinned_objects_sp1_types");
    }

    #[test]
    fn test_pinned_ref_wire_shape() {
        let json = serde_json::to_value(PinnedRef::new("s", "o")).unwrap();
        assert_eq!(json, serde_json::json!({"spaceId": "s", "objectId": "o"}));
    }

    #[tokio::test]
    async fn test_add_keeps_insertion_order_and_ignores_duplicates() {
        let store = MemoryPinnedStore::new();
        store.add("s1", "b").await.unwrap();
        store.add("s1", "a").await.unwrap();
        store.add("s1", "b").await.unwrap();
        let refs = store.list().await.unwrap();
        assert_eq!(refs, vec![PinnedRef::new("s1", "b"), PinnedRef::new("s1", "a")]);
    }

    #[tokio::test]
    async fn test_same_id_in_different_spaces_is_distinct() {
        let store = MemoryPinnedStore::new();
        store.add("s1", "x").await.unwrap();
        store.add("s2", "x").await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);
        assert!(store.contains("s2", "x").await.unwrap());
        assert!(!store.contains("s3", "x").await.unwrap());
    }

    #[tokio::test]
    async fn test_capacity_is_enforced() {
        let store = MemoryPinnedStore::with_capacity(defaults::MAX_PINNED_OBJECTS);
        for i in 0..defaults::MAX_PINNED_OBJECTS {
            store.add("s", &i.to_string()).await.unwrap();
        }
        let err = store.add("s", "overflow").await.unwrap_err();
        assert!(matches!(err, Error::PinnedLimit(5)));
        // re-pinning an existing ref at capacity is still a no-op
        store.add("s", "0").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryPinnedStore::from_refs(vec![
            PinnedRef::new("s", "a"),
            PinnedRef::new("s", "b"),
        ]);
        store.remove("s", "a").await.unwrap();
        store.remove("s", "missing").await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![PinnedRef::new("s", "b")]);
    }
}
