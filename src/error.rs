//! Error types for artcache
//!
//! All modules use `ArtcacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for artcache operations
pub type ArtcacheResult<T> = Result<T, ArtcacheError>;

/// All errors that can occur in artcache
#[derive(Error, Debug)]
pub enum ArtcacheError {
    // Resolve errors
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Source at {path} is not readable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache directory {path} is unavailable: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to produce {path}: {reason}")]
    ProductionFailed {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<Box<ArtcacheError>>,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArtcacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a production failure for the given destination
    pub fn production_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ProductionFailed {
            path: path.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Wrap a producer's error as a production failure for `path`.
    ///
    /// A production failure is re-targeted at `path` as is; any other error
    /// becomes the source and its message chain the reason.
    pub fn production_failed_by(path: impl Into<PathBuf>, cause: ArtcacheError) -> Self {
        match cause {
            Self::ProductionFailed { reason, source, .. } => Self::ProductionFailed {
                path: path.into(),
                reason,
                source,
            },
            cause => Self::ProductionFailed {
                path: path.into(),
                reason: message_chain(&cause),
                source: Some(Box::new(cause)),
            },
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Unreadable { .. } => {
                Some("Source paths are resolved relative to cache.root_dir (or --root)")
            }
            Self::DirectoryUnavailable { .. } => {
                Some("Check permissions and free space under the cache root")
            }
            Self::CommandFailed { .. } => {
                Some("Install ImageMagick or set producer.program in the config")
            }
            Self::ProductionFailed {
                source: Some(cause),
                ..
            } => cause.hint(),
            _ => None,
        }
    }
}

/// Display an error followed by each of its causes, skipping causes the
/// message already ends with
fn message_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut next = err.source();
    while let Some(cause) = next {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        next = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ArtcacheError::invalid_input("`options` may not be empty");
        assert!(err.to_string().contains("may not be empty"));
    }

    #[test]
    fn production_failed_display() {
        let err = ArtcacheError::production_failed("cache/resize/a.webp", "exit code 1");
        let msg = err.to_string();
        assert!(msg.contains("cache/resize/a.webp"));
        assert!(msg.contains("exit code 1"));
    }

    #[test]
    fn error_hint() {
        let err = ArtcacheError::command_failed(
            "magick",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.hint().unwrap().contains("ImageMagick"));
        assert!(ArtcacheError::Internal("x".into()).hint().is_none());
    }

    #[test]
    fn production_failure_keeps_cause() {
        let cause = ArtcacheError::command_failed(
            "magick",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
        );
        let err = ArtcacheError::production_failed_by("cache/resize/a.webp", cause);

        let msg = err.to_string();
        assert!(msg.contains("Command failed: magick: no such program"));
        assert!(err.hint().unwrap().contains("ImageMagick"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn production_failure_is_retargeted() {
        let inner = ArtcacheError::production_failed("/tmp/.tmp-x-a.webp", "exit status 1");
        let err = ArtcacheError::production_failed_by("cache/resize/a.webp", inner);

        match err {
            ArtcacheError::ProductionFailed {
                path,
                reason,
                source,
            } => {
                assert_eq!(path, PathBuf::from("cache/resize/a.webp"));
                assert_eq!(reason, "exit status 1");
                assert!(source.is_none());
            }
            other => panic!("expected ProductionFailed, got {other:?}"),
        }
    }

    #[test]
    fn message_chain_skips_repeated_cause() {
        let err = ArtcacheError::Unreadable {
            path: PathBuf::from("a.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(message_chain(&err), "Source at a.jpg is not readable: gone");
    }
}
