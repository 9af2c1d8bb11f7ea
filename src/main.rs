//! artcache - content-addressed artifact cache
//!
//! CLI entry point that dispatches to subcommands.

use artcache::cli::{Cli, Commands};
use artcache::config::{Config, ConfigManager};
use artcache::error::{ArtcacheError, ArtcacheResult};
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ArtcacheResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    // Find local config unless --no-local is set
    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| ArtcacheError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    init_logging(cli.verbose, &config);

    if let Some(ref path) = local_config_path {
        debug!("Found local config: {}", path.display());
    }

    // Dispatch to command
    match cli.command {
        Commands::Resolve(args) => artcache::cli::commands::resolve(args, &config).await,
        Commands::Key(args) => artcache::cli::commands::key(args, &config).await,
        Commands::Config(args) => {
            artcache::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("artcache=warn"),
        1 => EnvFilter::new("artcache=info"),
        _ => EnvFilter::new("artcache=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
