//! Key command - print the derived cache filename

use crate::cache::TransformSpec;
use crate::cli::args::KeyArgs;
use crate::cli::commands::resolve::cache_for;
use crate::config::Config;
use crate::error::ArtcacheResult;

/// Execute the key command
pub async fn execute(args: KeyArgs, config: &Config) -> ArtcacheResult<()> {
    let spec = TransformSpec::parse(&args.options)?;
    let cache = cache_for(args.root, config);

    let filename = cache
        .derive_filename(&args.source, &spec.params(), spec.forced_extension())
        .await?;

    println!("{}", filename);
    Ok(())
}
