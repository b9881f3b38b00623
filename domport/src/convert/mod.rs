//! Conversion seam for the external source-to-source engine.
//!
//! The actual Java-to-TypeScript conversion is an opaque external capability:
//! given a package root, it asynchronously transforms the tree's contents and
//! signals completion or failure. This module defines the [`Converter`] trait
//! that the orchestrator drives, plus the production [`CommandConverter`]
//! which reaches the engine as a subprocess.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

mod command;

pub use command::CommandConverter;

/// Errors that can occur during a single conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The converter program could not be started.
    #[error("Failed to start converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The converter ran but reported failure.
    #[error("Converter exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// The conversion exceeded its time limit.
    #[error("Conversion timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// I/O error while talking to the converter.
    #[error("Converter I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Input to a single conversion.
///
/// Created once per matched directory entry, passed by value into the
/// converter, and discarded after the conversion settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Directory treated as the top of the source tree to convert.
    pub package_root: PathBuf,
}

impl ConversionConfig {
    /// Create a configuration for the given package root.
    pub fn new(package_root: impl Into<PathBuf>) -> Self {
        Self {
            package_root: package_root.into(),
        }
    }

    /// Get the package root.
    pub fn package_root(&self) -> &Path {
        &self.package_root
    }
}

/// Evidence of a completed conversion.
///
/// The engine's output is opaque to this crate; the report only records how
/// long the conversion took.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Wall-clock duration of the conversion.
    pub elapsed: Duration,
}

/// The external conversion capability.
///
/// One asynchronous operation: transform the contents of a package root,
/// resolving with a [`ConversionReport`] or failing with a [`ConvertError`].
/// Failure semantics beyond the error itself (partial output on disk, etc.)
/// are the engine's business and are not modeled here.
///
/// The returned future is `Send` so the orchestrator can drive several
/// conversions concurrently.
pub trait Converter: Send + Sync {
    /// Convert the package root named by `config`.
    fn convert(
        &self,
        config: ConversionConfig,
    ) -> impl Future<Output = Result<ConversionReport, ConvertError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_config_new() {
        let config = ConversionConfig::new("/scan/dombler-fx-core");

        assert_eq!(config.package_root(), Path::new("/scan/dombler-fx-core"));
    }

    #[test]
    fn test_conversion_config_clone_eq() {
        let config = ConversionConfig::new("/scan/dombler-fx-core");
        assert_eq!(config.clone(), config);
    }

    #[test]
    fn test_convert_error_display() {
        let err = ConvertError::Timeout { seconds: 30 };
        assert_eq!(err.to_string(), "Conversion timed out after 30s");

        let err = ConvertError::Failed {
            status: "exit status: 2".to_string(),
            stderr: "bad input".to_string(),
        };
        assert!(err.to_string().contains("exit status: 2"));
        assert!(err.to_string().contains("bad input"));
    }
}
