//! Cache key derivation
//!
//! Derives content-addressed filenames from the bytes of a source file and
//! the transform parameters applied to it. Same content + same parameters =
//! same filename, wherever the source lives.

use crate::error::{ArtcacheError, ArtcacheResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Number of hex characters of the SHA256 digest kept in filenames (128 bits)
pub const HASH_LENGTH: usize = 32;

/// Separator used when joining transform parameters before slugging
const PARAM_SEPARATOR: &str = ",";

/// Hash a source file's contents using SHA256, returning the first
/// `HASH_LENGTH` hex chars
pub fn short_hash(path: &Path) -> ArtcacheResult<String> {
    let unreadable = |e| ArtcacheError::Unreadable {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = File::open(path).map_err(unreadable)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(unreadable)?;

    let mut hash = hex::encode(hasher.finalize());
    hash.truncate(HASH_LENGTH);
    Ok(hash)
}

/// Join parameters and strip everything that is not an ASCII letter or digit
pub fn slug<S: AsRef<str>>(params: &[S]) -> String {
    params
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(PARAM_SEPARATOR)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Pick the artifact extension, including its leading dot.
///
/// A non-empty forced extension wins; otherwise the source's own extension
/// is reused. Sources without an extension yield an empty string.
pub fn resolve_extension(source: &Path, forced: Option<&str>) -> String {
    match forced.map(|ext| ext.trim_start_matches('.')) {
        Some(ext) if !ext.is_empty() => format!(".{ext}"),
        _ => source
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default(),
    }
}

/// Derive the cache filename `{short_hash}_{slug}{extension}`
pub fn derive_filename<S: AsRef<str>>(
    source: &Path,
    params: &[S],
    forced_extension: Option<&str>,
) -> ArtcacheResult<String> {
    let hash = short_hash(source)?;
    let filename = format!(
        "{}_{}{}",
        hash,
        slug(params),
        resolve_extension(source, forced_extension)
    );

    debug!("Derived {} for {}", filename, source.display());
    Ok(filename)
}
