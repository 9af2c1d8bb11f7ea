//! Content-addressed artifact cache
//!
//! Derived artifacts (resized images and the like) are keyed by the SHA256
//! of their source's bytes plus a slug of the transform parameters, and
//! stored flat under a single cache directory.
//!
//! # Filename Layout
//!
//! ```text
//! {first 32 hex chars of sha256(source)}_{alphanumeric slug}{extension}
//! ```
//!
//! # Freshness
//!
//! | Destination | Result |
//! |-------------|--------|
//! | Missing | Regenerate |
//! | mtime <= source mtime | Regenerate (stale) |
//! | mtime > source mtime | Reuse |
//!
//! Nothing else is persisted: no manifest, no sidecar metadata, no eviction.

pub mod flight;
pub mod key;
pub mod params;
pub mod store;

pub use flight::FlightRegistry;
pub use key::{derive_filename, slug, HASH_LENGTH};
pub use params::TransformSpec;
pub use store::{must_regenerate, ArtifactCache, Resolved, DEFAULT_CACHE_SUBDIR};
