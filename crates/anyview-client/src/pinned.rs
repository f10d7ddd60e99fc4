//! File-backed pinned store and pinned-object loading.
//!
//! All namespaces share one JSON file mapping storage keys to ordered refs:
//!
//! ```json
//! {"pinned_objects_spaces": [{"spaceId": "s1", "objectId": "s1"}]}
//! ```

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};

use async_trait::async_trait;
use futures::future::join_all;
use once_cell::sync::Lazy;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use anyview_core::pinned::insert_pin;
use anyview_core::{
    Error, ObjectSource, PinnedNamespace, PinnedRef, PinnedStore, RawMember, RawObject, RawSpace,
    RawType, Result,
};

use crate::client::ApiClient;

type PinnedMap = BTreeMap<String, Vec<PinnedRef>>;

/// One lock per pinned file path, shared by every handle in the process.
static FILE_LOCKS: Lazy<std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(Default::default);

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut locks = FILE_LOCKS.lock().unwrap_or_else(PoisonError::into_inner);
    locks.entry(key).or_default().clone()
}

/// Pinned file shared by the per-namespace stores.
#[derive(Debug, Clone)]
pub struct PinnedFile {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl PinnedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            lock: lock_for(&path),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store handle for one namespace.
    pub fn store(&self, namespace: PinnedNamespace, capacity: Option<usize>) -> FilePinnedStore {
        FilePinnedStore {
            file: self.clone(),
            key: namespace.storage_key(),
            capacity,
        }
    }

    async fn read(&self) -> Result<PinnedMap> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(PinnedMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PinnedMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a uniquely named sibling temp file so readers never
    /// see a partial map.
    async fn write(&self, map: &PinnedMap) -> Result<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let contents = serde_json::to_vec_pretty(map)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&contents)?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

/// Pinned refs of one namespace, persisted in a [`PinnedFile`].
#[derive(Debug, Clone)]
pub struct FilePinnedStore {
    file: PinnedFile,
    key: String,
    capacity: Option<usize>,
}

impl FilePinnedStore {
    pub fn open(
        path: impl Into<PathBuf>,
        namespace: PinnedNamespace,
        capacity: Option<usize>,
    ) -> Self {
        PinnedFile::new(path).store(namespace, capacity)
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl PinnedStore for FilePinnedStore {
    async fn list(&self) -> Result<Vec<PinnedRef>> {
        let _guard = self.file.lock.lock().await;
        let mut map = self.file.read().await?;
        Ok(map.remove(&self.key).unwrap_or_default())
    }

    async fn add(&self, space_id: &str, object_id: &str) -> Result<()> {
        let _guard = self.file.lock.lock().await;
        let mut map = self.file.read().await?;
        let refs = map.entry(self.key.clone()).or_default();
        if insert_pin(refs, PinnedRef::new(space_id, object_id), self.capacity)? {
            self.file.write(&map).await?;
            debug!(component = "pinned", namespace = %self.key, space_id, object_id, "Pinned");
        }
        Ok(())
    }

    async fn remove(&self, space_id: &str, object_id: &str) -> Result<()> {
        let _guard = self.file.lock.lock().await;
        let mut map = self.file.read().await?;
        let Some(refs) = map.get_mut(&self.key) else {
            return Ok(());
        };
        let before = refs.len();
        refs.retain(|p| !p.matches(space_id, object_id));
        if refs.len() != before {
            self.file.write(&map).await?;
            debug!(component = "pinned", namespace = %self.key, space_id, object_id, "Unpinned");
        }
        Ok(())
    }
}

/// Fetch each ref with `fetch`, keeping pin order.
///
/// Refs whose target no longer exists are removed from the store; other
/// failures, including a failed removal, skip the ref.
async fn load_refs<'a, T, F, Fut>(
    store: &dyn PinnedStore,
    refs: &'a [PinnedRef],
    kind: &'static str,
    fetch: F,
) -> Vec<T>
where
    F: Fn(&'a PinnedRef) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let results = join_all(refs.iter().map(fetch)).await;

    let mut loaded = Vec::with_capacity(refs.len());
    for (pin, result) in refs.iter().zip(results) {
        match result {
            Ok(item) => loaded.push(item),
            Err(e) if e.is_not_found() => {
                warn!(
                    component = "pinned",
                    kind,
                    space_id = %pin.space_id,
                    object_id = %pin.object_id,
                    "Pinned item no longer exists, unpinning"
                );
                if let Err(e) = store.remove(&pin.space_id, &pin.object_id).await {
                    warn!(
                        component = "pinned",
                        kind,
                        space_id = %pin.space_id,
                        object_id = %pin.object_id,
                        error = %e,
                        "Failed to unpin missing item"
                    );
                }
            }
            Err(e) => warn!(
                component = "pinned",
                kind,
                space_id = %pin.space_id,
                object_id = %pin.object_id,
                error = %e,
                "Failed to load pinned item"
            ),
        }
    }
    debug!(component = "pinned", kind, pinned = refs.len(), result_count = loaded.len(), "Loaded pins");
    loaded
}

/// Fetch every pinned object in pin order.
///
/// Refs whose object no longer exists are removed from the store; other
/// failures skip the ref and leave it pinned.
pub async fn load_pinned_objects(
    store: &dyn PinnedStore,
    source: &dyn ObjectSource,
) -> Result<Vec<RawObject>> {
    let refs = store.list().await?;
    Ok(load_refs(store, &refs, "object", |p| {
        source.get_object(&p.space_id, &p.object_id)
    })
    .await)
}

/// Fetch pinned spaces. A space pin refers to the space by its `space_id`.
pub async fn load_pinned_spaces(store: &dyn PinnedStore, client: &ApiClient) -> Result<Vec<RawSpace>> {
    let refs = store.list().await?;
    Ok(load_refs(store, &refs, "space", |p| client.get_space(&p.space_id)).await)
}

pub async fn load_pinned_types(store: &dyn PinnedStore, client: &ApiClient) -> Result<Vec<RawType>> {
    let refs = store.list().await?;
    Ok(load_refs(store, &refs, "type", |p| client.get_type(&p.space_id, &p.object_id)).await)
}

pub async fn load_pinned_members(
    store: &dyn PinnedStore,
    client: &ApiClient,
) -> Result<Vec<RawMember>> {
    let refs = store.list().await?;
    Ok(load_refs(store, &refs, "member", |p| {
        client.get_member(&p.space_id, &p.object_id)
    })
    .await)
}
