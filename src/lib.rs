//! artcache - content-addressed cache for derived artifacts
//!
//! Maps a source file plus transform parameters to a deterministic cache
//! filename and regenerates the artifact only when it is missing or stale.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod producer;

pub use cache::{ArtifactCache, Resolved, TransformSpec};
pub use error::{ArtcacheError, ArtcacheResult};
pub use producer::{MagickProducer, Producer};
