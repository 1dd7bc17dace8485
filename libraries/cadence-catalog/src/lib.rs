//! Cadence Catalog
//!
//! Playlist and song CRUD on top of a [`CatalogStore`], with validation,
//! stable ordering and background stream resolution.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_catalog::CatalogService;
//! use cadence_core::{CatalogStore, UrlResolver};
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     store: Arc<dyn CatalogStore>,
//! #     resolver: Arc<dyn UrlResolver>,
//! # ) -> cadence_core::Result<()> {
//! let catalog = CatalogService::new(store, resolver);
//!
//! let playlist = catalog.create_playlist("Road Trip").await?;
//! let song = catalog
//!     .add_song(&playlist.id, "Intro", "https://youtu.be/dQw4w9WgXcQ")
//!     .await?;
//! assert!(song.stream_url.is_none()); // resolved in the background
//! # Ok(())
//! # }
//! ```
//!
//! [`CatalogStore`]: cadence_core::CatalogStore

mod service;

pub use service::CatalogService;
