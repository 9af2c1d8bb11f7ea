//! Resolve command - produce or reuse a cached artifact

use crate::cache::{ArtifactCache, Resolved, TransformSpec};
use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::config::Config;
use crate::error::ArtcacheResult;
use crate::producer::MagickProducer;
use serde::Serialize;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> ArtcacheResult<()> {
    let spec = TransformSpec::parse(&args.options)?;
    let cache = cache_for(args.root, config);
    let producer = MagickProducer::from_config(&config.producer);

    let resolved = cache.resolve_spec(&args.source, &spec, &producer).await?;

    match args.format {
        OutputFormat::Text => println!("{}", resolved.public_url(&config.site.base_url)),
        OutputFormat::Json => print_json(&resolved, &config.site.base_url)?,
    }

    Ok(())
}

/// Build the cache, letting `--root` override the configured root
pub(crate) fn cache_for(root: Option<std::path::PathBuf>, config: &Config) -> ArtifactCache {
    let mut cache_config = config.cache.clone();
    if let Some(root) = root {
        cache_config.root_dir = root;
    }
    ArtifactCache::from_config(&cache_config)
}

fn print_json(resolved: &Resolved, base_url: &str) -> ArtcacheResult<()> {
    #[derive(Serialize)]
    struct ResolvedJson {
        relative: String,
        absolute: String,
        url: String,
        regenerated: bool,
    }

    let json = ResolvedJson {
        relative: resolved.relative.display().to_string(),
        absolute: resolved.absolute.display().to_string(),
        url: resolved.public_url(base_url),
        regenerated: resolved.regenerated,
    };

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
