//! Cadence Resolver
//!
//! Turns YouTube links into playable stream URLs.
//!
//! Validation and id extraction are pure and synchronous. Resolution is
//! delegated to a pluggable [`StreamExtractor`]; without one the resolver
//! answers [`ResolveError::NotImplemented`], which the catalog treats as
//! "not resolved yet".
//!
//! # Example
//!
//! ```rust
//! use cadence_core::UrlResolver;
//! use cadence_resolver::YouTubeResolver;
//!
//! let resolver = YouTubeResolver::default();
//! assert!(resolver.validate("https://youtu.be/dQw4w9WgXcQ"));
//! assert_eq!(
//!     resolver.extract_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
//!     Some("dQw4w9WgXcQ"),
//! );
//! ```

mod resolver;
pub mod youtube;

pub use cadence_core::ResolveError;
pub use resolver::{ResolverConfig, StreamExtractor, YouTubeResolver};
