//! Configuration management for artcache

pub mod schema;

pub use schema::Config;

use crate::error::{ArtcacheError, ArtcacheResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Project-local config file name, discovered by walking up from the cwd
pub const LOCAL_CONFIG_NAME: &str = ".artcache.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("artcache")
            .join("config.toml")
    }

    /// Find the nearest `.artcache.toml` in `start` or any ancestor
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, creating default if not exists
    pub async fn load(&self) -> ArtcacheResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> ArtcacheResult<Config> {
        let value = read_table(path).await?;
        value.try_into().map_err(|e: toml::de::Error| ArtcacheError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load the global config with a project-local file layered on top.
    ///
    /// Keys set locally win. A relative `cache.root_dir` is taken relative
    /// to the directory holding the local file.
    pub async fn load_merged(&self, local: Option<&Path>) -> ArtcacheResult<Config> {
        let Some(local) = local else {
            return self.load().await;
        };

        let mut merged = if self.config_path.exists() {
            read_table(&self.config_path).await?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };
        merge_values(&mut merged, read_table(local).await?);

        let mut config: Config =
            merged
                .try_into()
                .map_err(|e: toml::de::Error| ArtcacheError::ConfigInvalid {
                    path: local.to_path_buf(),
                    reason: e.to_string(),
                })?;

        if config.cache.root_dir.is_relative() {
            if let Some(dir) = local.parent() {
                config.cache.root_dir = dir.join(&config.cache.root_dir);
            }
        }

        debug!("Merged local config from {}", local.display());
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> ArtcacheResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            ArtcacheError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> ArtcacheResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ArtcacheError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_table(path: &Path) -> ArtcacheResult<toml::Value> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ArtcacheError::io(format!("reading config from {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| ArtcacheError::ConfigInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.producer.program, "magick");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.site.base_url = "/blog".to_string();

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.site.base_url, "/blog");
    }

    #[tokio::test]
    async fn invalid_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[cache\nroot_dir = 1").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, ArtcacheError::ConfigInvalid { .. }));
    }

    #[tokio::test]
    async fn local_config_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        std::fs::write(
            &global,
            "[producer]\nprogram = \"convert\"\nstrip = false\n\n[site]\nbase_url = \"/global\"\n",
        )
        .unwrap();

        let project = temp.path().join("project");
        std::fs::create_dir_all(&project).unwrap();
        let local = project.join(LOCAL_CONFIG_NAME);
        std::fs::write(&local, "[site]\nbase_url = \"/local\"\n\n[cache]\nroot_dir = \"site\"\n")
            .unwrap();

        let config = ConfigManager::with_path(global)
            .load_merged(Some(&local))
            .await
            .unwrap();

        assert_eq!(config.site.base_url, "/local");
        assert_eq!(config.producer.program, "convert");
        assert!(!config.producer.strip);
        assert_eq!(config.cache.root_dir, project.join("site"));
    }

    #[test]
    fn find_local_config_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join(LOCAL_CONFIG_NAME), "").unwrap();

        assert_eq!(
            ConfigManager::find_local_config(&nested),
            Some(temp.path().join(LOCAL_CONFIG_NAME))
        );
    }
}
