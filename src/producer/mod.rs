//! Artifact producers
//!
//! A producer performs the actual transformation: it reads the source,
//! applies the transform parameters and writes a complete artifact to the
//! destination path it is handed. The cache treats it as opaque and only
//! looks at whether it succeeded.

mod magick;

pub use magick::MagickProducer;

use crate::error::ArtcacheResult;
use async_trait::async_trait;
use std::path::Path;

/// Transformation backend invoked by the cache on a miss
#[async_trait]
pub trait Producer: Send + Sync {
    /// Write the artifact for `source` + `params` to `dest`
    async fn produce(&self, source: &Path, params: &[String], dest: &Path) -> ArtcacheResult<()>;
}

/// Plain functions and closures are producers.
///
/// They run on the calling task, so they should be quick or the caller
/// should accept blocking it.
#[async_trait]
impl<F> Producer for F
where
    F: Fn(&Path, &[String], &Path) -> ArtcacheResult<()> + Send + Sync,
{
    async fn produce(&self, source: &Path, params: &[String], dest: &Path) -> ArtcacheResult<()> {
        self(source, params, dest)
    }
}
