//! Cadence Core
//!
//! Shared types, traits, and error handling for Cadence.
//!
//! Every other crate in the workspace builds on the definitions here:
//! the storage crate implements [`CatalogStore`], the resolver crate implements
//! [`UrlResolver`], and the catalog service orchestrates both.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Playlist`, `Song` and their identifiers
//! - **Core Traits**: `CatalogStore` (persistence gateway), `UrlResolver`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Playlist, Song};
//!
//! let playlist = Playlist::new("Road Trip", 0);
//! let song = Song::new(
//!     playlist.id.clone(),
//!     "Never Gonna Give You Up",
//!     "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!     0,
//! );
//!
//! assert_eq!(song.playlist_id, playlist.id);
//! assert!(!song.is_resolved());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod resolver;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result};
pub use resolver::{ResolveError, UrlResolver};
pub use storage::CatalogStore;

pub use types::{Playlist, PlaylistId, Song, SongId};
