//! Configuration schema for artcache
//!
//! Configuration is stored at `~/.config/artcache/config.toml`, optionally
//! overridden by a project-local `.artcache.toml`.

use crate::cache::DEFAULT_CACHE_SUBDIR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache location
    pub cache: CacheConfig,

    /// Publication settings
    pub site: SiteConfig,

    /// Producer settings
    pub producer: ProducerConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory sources are resolved against
    pub root_dir: PathBuf,

    /// Cache directory, relative to `root_dir`
    pub cache_subdir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            cache_subdir: PathBuf::from(DEFAULT_CACHE_SUBDIR),
        }
    }
}

/// Publication settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL prepended to published artifact paths (e.g. "/blog")
    pub base_url: String,
}

/// ImageMagick producer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Program to run (`magick`, or `convert` for ImageMagick 6)
    pub program: String,

    /// Apply EXIF orientation before resizing
    pub auto_orient: bool,

    /// Strip profiles and comments from the output
    pub strip: bool,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            program: "magick".to_string(),
            auto_orient: true,
            strip: true,
        }
    }
}
