//! Transform option parsing
//!
//! Site templates pass a single comma-separated option string such as
//! `"800x800>,webp,80"`: a resize geometry, then an optional output format,
//! then an optional quality.

use crate::error::{ArtcacheError, ArtcacheResult};
use std::fmt;

/// Parsed transform options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSpec {
    /// ImageMagick resize geometry (e.g. `800x800>`)
    pub resize: String,
    /// Output format, which also forces the artifact extension
    pub format: Option<String>,
    /// Raw quality component as written by the caller
    pub quality: Option<String>,
}

impl TransformSpec {
    /// Parse an option string of the form `resize[,format[,quality]]`
    pub fn parse(options: &str) -> ArtcacheResult<Self> {
        if options.is_empty() {
            return Err(ArtcacheError::invalid_input("`options` may not be empty"));
        }

        let mut parts = options.split(',').map(str::trim);

        let resize = parts.next().unwrap_or_default().to_string();
        if resize.is_empty() {
            return Err(ArtcacheError::invalid_input(format!(
                "missing resize option in '{options}'"
            )));
        }

        let format = parts.next().filter(|s| !s.is_empty()).map(String::from);
        let quality = parts.next().filter(|s| !s.is_empty()).map(String::from);

        Ok(Self {
            resize,
            format,
            quality,
        })
    }

    /// Ordered parameters used for key derivation.
    ///
    /// Positions are kept: a quality without a format yields an empty
    /// format slot, which contributes nothing to the slug.
    pub fn params(&self) -> Vec<String> {
        let mut params = vec![self.resize.clone()];
        match (&self.format, &self.quality) {
            (format, Some(quality)) => {
                params.push(format.clone().unwrap_or_default());
                params.push(quality.clone());
            }
            (Some(format), None) => params.push(format.clone()),
            (None, None) => {}
        }
        params
    }

    /// Extension forced by the requested output format
    pub fn forced_extension(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// Quality level, only when it falls within 1..=100
    pub fn quality_level(&self) -> Option<u8> {
        parse_quality(self.quality.as_deref()?)
    }

    /// Rebuild a spec from ordered parameters (inverse of `params`)
    pub fn from_params<S: AsRef<str>>(params: &[S]) -> ArtcacheResult<Self> {
        let joined = params
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        Self::parse(&joined)
    }
}

impl fmt::Display for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resize option: '{}'", self.resize)?;
        if let Some(format) = &self.format {
            write!(f, ", format: {}", format)?;
        }
        if let Some(quality) = &self.quality {
            write!(f, ", quality: {}", quality)?;
        }
        Ok(())
    }
}

/// Parse a quality component the way template authors write it.
///
/// Leading digits are taken (`"80"` and `"80%"` both give 80); anything
/// outside 1..=100 is ignored rather than rejected.
pub fn parse_quality(raw: &str) -> Option<u8> {
    let digits: String = raw.trim().chars().take_while(char::is_ascii_digit).collect();
    let value: u32 = digits.parse().ok()?;
    (1..=100).contains(&value).then_some(value as u8)
}
