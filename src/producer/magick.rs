//! ImageMagick-backed producer
//!
//! Shells out to `magick` (or a configured compatible binary) to auto-orient,
//! resize and strip the source image. The output format follows the
//! destination's extension.

use crate::cache::TransformSpec;
use crate::config::schema::ProducerConfig;
use crate::error::{ArtcacheError, ArtcacheResult};
use crate::producer::Producer;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Producer that runs ImageMagick
#[derive(Debug, Clone)]
pub struct MagickProducer {
    program: String,
    auto_orient: bool,
    strip: bool,
}

impl MagickProducer {
    /// Create a producer invoking the given program with default flags
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            auto_orient: true,
            strip: true,
        }
    }

    /// Create a producer from the `[producer]` config section
    pub fn from_config(config: &ProducerConfig) -> Self {
        Self {
            program: config.program.clone(),
            auto_orient: config.auto_orient,
            strip: config.strip,
        }
    }

    /// Build the argument list for one conversion
    pub fn build_args(&self, source: &Path, spec: &TransformSpec, dest: &Path) -> Vec<String> {
        let mut args = vec![source.display().to_string()];

        if self.auto_orient {
            args.push("-auto-orient".to_string());
        }

        args.push("-resize".to_string());
        args.push(spec.resize.clone());

        if self.strip {
            args.push("-strip".to_string());
        }

        if let Some(quality) = spec.quality_level() {
            args.push("-quality".to_string());
            args.push(quality.to_string());
        }

        args.push(dest.display().to_string());
        args
    }
}

impl Default for MagickProducer {
    fn default() -> Self {
        Self::new("magick")
    }
}

#[async_trait]
impl Producer for MagickProducer {
    async fn produce(&self, source: &Path, params: &[String], dest: &Path) -> ArtcacheResult<()> {
        let spec = TransformSpec::from_params(params)?;
        let args = self.build_args(source, &spec, dest);

        debug!("Executing: {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ArtcacheError::command_failed(&self.program, e))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ArtcacheError::production_failed(
                dest,
                format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    stderr.trim()
                ),
            ))
        }
    }
}
