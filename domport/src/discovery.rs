//! Package root discovery and name filtering.
//!
//! This module locates convertible package directories: it enumerates the
//! immediate children of a configured scan root and keeps the directories
//! whose names start with a literal prefix (by default
//! [`crate::DEFAULT_PREFIX`]).

use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

/// Errors that can occur while discovering package roots.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The scan root does not exist or is not a directory.
    #[error("Scan root is not a directory: {0}")]
    RootNotFound(PathBuf),

    /// Enumerating the scan root failed.
    ///
    /// Fatal for the whole run; there is no recovery path for a root that
    /// cannot be listed.
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Literal-prefix predicate over directory entry names.
///
/// The prefix is matched literally: metacharacters in the configured prefix
/// (`.`, `+`, ...) select only themselves, never act as pattern syntax. The
/// predicate is pure and has no error conditions; a name that is empty or
/// shorter than the prefix simply fails the match.
///
/// # Example
///
/// ```
/// use domport::discovery::PrefixFilter;
///
/// let filter = PrefixFilter::new("dombler-fx-core");
/// assert!(filter.matches("dombler-fx-core"));
/// assert!(filter.matches("dombler-fx-core-extra"));
/// assert!(!filter.matches("dombler"));
/// ```
#[derive(Debug, Clone)]
pub struct PrefixFilter {
    prefix: String,
    pattern: Regex,
}

impl PrefixFilter {
    /// Create a filter for the given literal prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        // Escaping keeps the anchored pattern literal for any prefix, so the
        // construction cannot fail.
        let pattern = Regex::new(&format!("^{}", regex::escape(&prefix)))
            .expect("escaped literal prefix is always a valid pattern");
        Self { prefix, pattern }
    }

    /// Get the configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Test whether `name` starts with the configured prefix.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

/// A discovered package root.
///
/// Pairs the directory name with its full path under the scan root. The path
/// always ends with the name that matched the filter, so a later failure can
/// be attributed back to the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Directory name that matched the prefix filter.
    pub name: String,

    /// Full path to the package root (scan root joined with the name).
    pub path: PathBuf,
}

impl PackageEntry {
    /// Create a new package entry.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Discovers convertible package roots under a scan root.
///
/// The scan root is an explicit, injected value rather than an ambient
/// relative path, so discovery can be tested against a temporary tree.
#[derive(Debug, Clone)]
pub struct PackageDiscovery {
    /// Directory whose immediate children are scanned.
    scan_root: PathBuf,

    /// Name predicate selecting convertible directories.
    filter: PrefixFilter,
}

impl PackageDiscovery {
    /// Create a discovery for the given scan root and name prefix.
    pub fn new(scan_root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            scan_root: scan_root.into(),
            filter: PrefixFilter::new(prefix),
        }
    }

    /// Get the scan root.
    pub fn scan_root(&self) -> &Path {
        &self.scan_root
    }

    /// Get the name filter.
    pub fn filter(&self) -> &PrefixFilter {
        &self.filter
    }

    /// Check if the scan root exists.
    pub fn exists(&self) -> bool {
        self.scan_root.exists() && self.scan_root.is_dir()
    }

    /// Find all package roots whose names match the prefix.
    ///
    /// Only immediate children are considered. Non-directories and hidden
    /// entries are skipped. Entries are returned sorted by name, so repeated
    /// scans of an unchanged tree yield the same sequence.
    pub fn find_packages(&self) -> Result<Vec<PackageEntry>, DiscoveryError> {
        if !self.exists() {
            return Err(DiscoveryError::RootNotFound(self.scan_root.clone()));
        }

        let entries = std::fs::read_dir(&self.scan_root).map_err(|source| {
            DiscoveryError::ReadDir {
                path: self.scan_root.clone(),
                source,
            }
        })?;

        let mut packages = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|source| DiscoveryError::ReadDir {
                path: self.scan_root.clone(),
                source,
            })?;
            let path = entry.path();

            // Skip non-directories
            if !path.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();

            // Skip hidden folders
            if name.starts_with('.') {
                continue;
            }

            if self.filter.matches(&name) {
                packages.push(PackageEntry::new(name, path));
            }
        }

        // Sort by name for a deterministic dispatch order
        packages.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(packages)
    }
}
