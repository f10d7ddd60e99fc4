//! # anyview-client
//!
//! Collaborators for `anyview-core` backed by the local knowledge-base REST
//! API: a page fetcher and object lookup over HTTP, a gateway file resolver
//! for uploaded icons, and a JSON-file pinned store.
//!
//! ```no_run
//! use anyview_client::{ApiClient, GatewayFileResolver};
//! use anyview_core::{Hydration, Mapper, PageKind, PageRequest, PageSource};
//!
//! # async fn run() -> anyview_core::Result<()> {
//! let client = ApiClient::from_env()?;
//! let space = client.get_space("space_id").await?;
//! let files = GatewayFileResolver::new(space.gateway_url, client.config().icon_width)?;
//! let mapper = Mapper::new(&files).with_object_source(&client);
//!
//! let limit = client.config().page_limit;
//! let page = client
//!     .fetch_page(PageRequest::page(PageKind::Objects, &space.id, 0, limit))
//!     .await?;
//! let objects = mapper.map_page(&space.id, page, Hydration::Summary).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod files;
pub mod pinned;

pub use client::{ApiClient, SearchRequest, SortDirection, SortOptions};
pub use config::ClientConfig;
pub use files::GatewayFileResolver;
pub use pinned::{
    load_pinned_members, load_pinned_objects, load_pinned_spaces, load_pinned_types,
    FilePinnedStore, PinnedFile,
};
