//! Subprocess-backed converter implementation.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::debug;

use super::{ConversionConfig, ConversionReport, ConvertError, Converter};

/// How much of the converter's stderr is kept for error reporting.
const STDERR_TAIL_BYTES: usize = 4096;

/// Runs the external converter as a subprocess.
///
/// The converter is invoked as `program [args...] <package_root>`; an exit
/// status of zero means the conversion succeeded. Anything the engine writes
/// or leaves behind inside the package root is its own business.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use domport::convert::CommandConverter;
///
/// let converter = CommandConverter::new("java2ts")
///     .with_arg("--strict")
///     .with_timeout(Duration::from_secs(600));
///
/// assert_eq!(converter.program(), "java2ts");
/// ```
#[derive(Debug, Clone)]
pub struct CommandConverter {
    /// Converter executable name or path.
    program: String,

    /// Extra arguments passed before the package root.
    args: Vec<String>,

    /// Per-conversion time limit. `None` means no limit.
    timeout: Option<Duration>,
}

impl CommandConverter {
    /// Create a converter invoking the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Add an argument passed before the package root.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the per-conversion time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the configured program.
    pub fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, config: ConversionConfig) -> Result<ConversionReport, ConvertError> {
        let started = Instant::now();

        debug!(
            program = %self.program,
            package_root = %config.package_root.display(),
            "starting conversion"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&config.package_root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConvertError::Failed {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        Ok(ConversionReport {
            elapsed: started.elapsed(),
        })
    }
}

impl Converter for CommandConverter {
    async fn convert(&self, config: ConversionConfig) -> Result<ConversionReport, ConvertError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(config))
                .await
                .unwrap_or(Err(ConvertError::Timeout {
                    seconds: limit.as_secs(),
                })),
            None => self.run(config).await,
        }
    }
}

/// Decode the tail of captured stderr for error reporting.
fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
    String::from_utf8_lossy(&stderr[start..]).trim().to_string()
}
