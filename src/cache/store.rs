//! Artifact cache
//!
//! Resolves a (source, transform parameters) pair to a cached artifact,
//! regenerating it through a [`Producer`] when it is missing or stale.
//! All state lives on the filesystem: the artifact's name carries its key
//! and its mtime decides freshness.

use crate::cache::flight::FlightRegistry;
use crate::cache::key;
use crate::cache::params::TransformSpec;
use crate::config::schema::CacheConfig;
use crate::error::{ArtcacheError, ArtcacheResult};
use crate::producer::Producer;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// Default cache directory, relative to the root
pub const DEFAULT_CACHE_SUBDIR: &str = "cache/resize";

/// Outcome of a successful resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Artifact path relative to the root, for publication
    pub relative: PathBuf,
    /// Absolute artifact path
    pub absolute: PathBuf,
    /// Whether the producer ran during this call
    pub regenerated: bool,
}

impl Resolved {
    /// Join the relative path onto a site base URL using `/` separators
    pub fn public_url(&self, base_url: &str) -> String {
        let relative = self
            .relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", base_url.trim_end_matches('/'), relative)
    }
}

/// Content-addressed cache of derived artifacts under `root/cache_subdir`.
///
/// Clones share the same single-flight registry, so concurrent resolves of
/// one key through any clone run the producer at most once at a time.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    root_dir: PathBuf,
    cache_subdir: PathBuf,
    flights: Arc<FlightRegistry>,
}

impl ArtifactCache {
    /// Create a cache rooted at `root_dir`, storing artifacts in `cache_subdir`.
    ///
    /// A relative root is made absolute against the working directory.
    pub fn new(root_dir: impl Into<PathBuf>, cache_subdir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        let root_dir = std::path::absolute(&root_dir).unwrap_or(root_dir);
        Self {
            root_dir,
            cache_subdir: cache_subdir.into(),
            flights: Arc::new(FlightRegistry::new()),
        }
    }

    /// Create a cache from the `[cache]` config section
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(&config.root_dir, &config.cache_subdir)
    }

    /// Root directory sources are resolved against
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Absolute cache directory
    pub fn cache_dir(&self) -> PathBuf {
        self.root_dir.join(&self.cache_subdir)
    }

    /// Resolve `source` under the root, rejecting paths that would escape it
    pub fn source_path(&self, source: &Path) -> ArtcacheResult<PathBuf> {
        if source.as_os_str().is_empty() {
            return Err(ArtcacheError::invalid_input("`source` may not be empty"));
        }

        let escapes = source.components().any(|c| {
            matches!(
                c,
                Component::RootDir | Component::Prefix(_) | Component::ParentDir
            )
        });
        if escapes {
            return Err(ArtcacheError::invalid_input(format!(
                "`source` must be a relative path inside the root: {}",
                source.display()
            )));
        }

        Ok(self.root_dir.join(source))
    }

    /// Derive the artifact filename without touching the cache directory
    pub async fn derive_filename<S: AsRef<str>>(
        &self,
        source: &Path,
        params: &[S],
        forced_extension: Option<&str>,
    ) -> ArtcacheResult<String> {
        let source_path = self.source_path(source)?;
        let params = validate_params(params)?;
        hash_in_background(source_path, params, forced_extension).await
    }

    /// Resolve an artifact, running `producer` only when it is missing or stale.
    ///
    /// Returns the artifact's relative and absolute paths whether or not it
    /// was regenerated. Nothing is created on disk if validation or hashing
    /// fails.
    pub async fn resolve<S, P>(
        &self,
        source: &Path,
        params: &[S],
        forced_extension: Option<&str>,
        producer: &P,
    ) -> ArtcacheResult<Resolved>
    where
        S: AsRef<str>,
        P: Producer + ?Sized,
    {
        let source_path = self.source_path(source)?;
        let params = validate_params(params)?;

        let filename =
            hash_in_background(source_path.clone(), params.clone(), forced_extension).await?;
        let absolute = self.cache_dir().join(&filename);
        let relative = self.cache_subdir.join(&filename);

        self.ensure_cache_dir().await?;

        let resolved = |regenerated| Resolved {
            relative: relative.clone(),
            absolute: absolute.clone(),
            regenerated,
        };

        if !must_regenerate(&absolute, &source_path).await? {
            debug!("Cache hit: {}", relative.display());
            return Ok(resolved(false));
        }

        let _flight = self.flights.acquire(&filename).await;

        // Another resolver may have produced it while we waited.
        if !must_regenerate(&absolute, &source_path).await? {
            debug!("Produced concurrently: {}", relative.display());
            return Ok(resolved(false));
        }

        info!(
            "Generating '{}' to '{}' - using params: {}",
            source.display(),
            relative.display(),
            params.join(", ")
        );

        produce_atomically(producer, &source_path, &params, &absolute).await?;

        Ok(resolved(true))
    }

    /// Resolve using a parsed option string; the format forces the extension
    pub async fn resolve_spec<P>(
        &self,
        source: &Path,
        spec: &TransformSpec,
        producer: &P,
    ) -> ArtcacheResult<Resolved>
    where
        P: Producer + ?Sized,
    {
        self.resolve(source, &spec.params(), spec.forced_extension(), producer)
            .await
    }

    /// Create the cache directory and any missing parents
    async fn ensure_cache_dir(&self) -> ArtcacheResult<()> {
        let dir = self.cache_dir();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ArtcacheError::DirectoryUnavailable {
                path: dir.clone(),
                source: e,
            })?;
        debug!("Cache directory ready: {}", dir.display());
        Ok(())
    }
}

/// Reject empty parameter lists and lists that carry no content
fn validate_params<S: AsRef<str>>(params: &[S]) -> ArtcacheResult<Vec<String>> {
    if params.is_empty() {
        return Err(ArtcacheError::invalid_input(
            "`transform params` may not be empty",
        ));
    }

    let params: Vec<String> = params.iter().map(|p| p.as_ref().to_string()).collect();
    if params.iter().all(|p| p.trim().is_empty()) {
        return Err(ArtcacheError::invalid_input(
            "`transform params` may not all be blank",
        ));
    }

    Ok(params)
}

/// Hash the source on the blocking pool
async fn hash_in_background(
    source_path: PathBuf,
    params: Vec<String>,
    forced_extension: Option<&str>,
) -> ArtcacheResult<String> {
    let forced_extension = forced_extension.map(String::from);
    tokio::task::spawn_blocking(move || {
        key::derive_filename(&source_path, &params, forced_extension.as_deref())
    })
    .await
    .map_err(|e| ArtcacheError::Internal(format!("hashing task failed: {e}")))?
}

/// Whether the artifact at `dest` has to be (re)generated from `source`.
///
/// True when `dest` is missing or its mtime is not strictly newer than the
/// source's; equal timestamps count as stale.
pub async fn must_regenerate(dest: &Path, source: &Path) -> ArtcacheResult<bool> {
    let dest_modified = match fs::metadata(dest).await {
        Ok(meta) => meta
            .modified()
            .map_err(|e| ArtcacheError::io(format!("reading mtime of {}", dest.display()), e))?,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => {
            return Err(ArtcacheError::io(
                format!("reading metadata of {}", dest.display()),
                e,
            ))
        }
    };

    let unreadable = |e| ArtcacheError::Unreadable {
        path: source.to_path_buf(),
        source: e,
    };
    let source_modified = fs::metadata(source)
        .await
        .map_err(unreadable)?
        .modified()
        .map_err(unreadable)?;

    Ok(dest_modified <= source_modified)
}

/// Run the producer against a temporary sibling of `dest`, then move it into
/// place. The temporary is removed if anything fails.
async fn produce_atomically<P>(
    producer: &P,
    source: &Path,
    params: &[String],
    dest: &Path,
) -> ArtcacheResult<()>
where
    P: Producer + ?Sized,
{
    let tmp = temp_path(dest);

    if let Err(e) = producer.produce(source, params, &tmp).await {
        discard(&tmp).await;
        return Err(ArtcacheError::production_failed_by(dest, e));
    }

    if let Err(e) = fs::rename(&tmp, dest).await {
        discard(&tmp).await;
        return Err(ArtcacheError::production_failed_by(
            dest,
            ArtcacheError::io("moving producer output into place", e),
        ));
    }

    Ok(())
}

/// Hidden temporary name in the same directory, keeping the extension so
/// producers that infer the output format from it still work
fn temp_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".tmp-{}-{}", uuid::Uuid::new_v4().simple(), name))
}

async fn discard(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp).await {
        if e.kind() != ErrorKind::NotFound {
            warn!("Failed to remove temporary {}: {}", tmp.display(), e);
        }
    }
}
