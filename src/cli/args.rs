//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// artcache - content-addressed cache for derived artifacts
///
/// Resolves a source image plus resize options to a cached, content-addressed
/// artifact, regenerating it only when missing or stale.
#[derive(Parser, Debug)]
#[command(name = "artcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ARTCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .artcache.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a source to its cached artifact, generating it if needed
    Resolve(ResolveArgs),

    /// Print the cache filename for a source without generating anything
    Key(KeyArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Source path, relative to the root (e.g. assets/photo.jpg)
    pub source: PathBuf,

    /// Options: resize[,format[,quality]] (e.g. "800x800>,webp,80")
    pub options: String,

    /// Root directory (defaults to cache.root_dir from config)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the key command
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Source path, relative to the root
    pub source: PathBuf,

    /// Options: resize[,format[,quality]]
    pub options: String,

    /// Root directory (defaults to cache.root_dir from config)
    #[arg(short, long)]
    pub root: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., site.base_url)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for resolve
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Public URL only
    Text,
    /// JSON object with paths and hit/miss
    Json,
}
