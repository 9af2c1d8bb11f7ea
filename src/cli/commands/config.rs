//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{ArtcacheError, ArtcacheResult};
use console::style;

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> ArtcacheResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            // Edit the file's own contents, not the merged view
            let current = manager.load().await?;
            let updated = set_value(&current, &key, &value)?;
            manager.save(&updated).await?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> ArtcacheResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> ArtcacheResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("!").yellow(),
            path.display()
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    println!(
        "{} Configuration initialized at {}",
        style("✓").green(),
        path.display()
    );

    Ok(())
}

/// Apply a dot-separated key to a copy of the config
fn set_value(config: &Config, key: &str, value: &str) -> ArtcacheResult<Config> {
    let mut config = config.clone();
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,

        ["cache", "root_dir"] => config.cache.root_dir = value.into(),
        ["cache", "cache_subdir"] => config.cache.cache_subdir = value.into(),

        ["site", "base_url"] => config.site.base_url = value.to_string(),

        ["producer", "program"] => config.producer.program = value.to_string(),
        ["producer", "auto_orient"] => config.producer.auto_orient = parse_bool(value)?,
        ["producer", "strip"] => config.producer.strip = parse_bool(value)?,

        _ => {
            return Err(ArtcacheError::invalid_input(format!(
                "Unknown config key: {key}"
            )))
        }
    }

    Ok(config)
}

fn parse_bool(value: &str) -> ArtcacheResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ArtcacheError::invalid_input(format!(
            "Invalid boolean value: {value}"
        ))),
    }
}

fn parse_log_format(value: &str) -> ArtcacheResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(ArtcacheError::invalid_input(format!(
            "Invalid log format: {value} (expected text or json)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn set_known_keys() {
        let config = Config::default();

        let config = set_value(&config, "site.base_url", "/blog").unwrap();
        let config = set_value(&config, "producer.strip", "off").unwrap();
        let config = set_value(&config, "cache.cache_subdir", "derived").unwrap();

        assert_eq!(config.site.base_url, "/blog");
        assert!(!config.producer.strip);
        assert_eq!(config.cache.cache_subdir, PathBuf::from("derived"));
    }

    #[test]
    fn set_unknown_key_fails() {
        let err = set_value(&Config::default(), "vm.name", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn set_rejects_bad_values() {
        assert!(set_value(&Config::default(), "producer.strip", "maybe").is_err());
        assert!(set_value(&Config::default(), "general.log_format", "xml").is_err());
    }
}
