//! Persistent configuration.
//!
//! Settings live in an INI file under the user's config directory
//! (`~/.config/domport/config.ini` on Linux). Every setting has a default, so
//! a missing file is not an error; the CLI overlays flags on top of whatever
//! is loaded here.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::DEFAULT_PREFIX;

/// Default converter program invoked per package root.
pub const DEFAULT_CONVERTER: &str = "java2ts";

/// Default bound on concurrently running conversions.
pub const DEFAULT_PARALLEL: usize = 4;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory could be resolved for this user.
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    /// Reading or parsing the config file failed.
    #[error("Failed to load config {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// Writing the config file failed.
    #[error("Failed to write config {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// A value does not parse for its key.
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Settings controlling discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory whose immediate children are scanned.
    pub root: PathBuf,

    /// Literal name prefix selecting convertible directories.
    pub prefix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        // The original tool always scanned the parent of its own checkout.
        Self {
            root: PathBuf::from(".."),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Settings controlling conversion dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Converter program name or path.
    pub command: String,

    /// Maximum concurrent conversions. 1 means sequential.
    pub parallel: usize,

    /// Per-conversion timeout in seconds. 0 means no limit.
    pub timeout_secs: u64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_CONVERTER.to_string(),
            parallel: DEFAULT_PARALLEL,
            timeout_secs: 0,
        }
    }
}

/// The full on-disk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// `[scan]` section.
    pub scan: ScanConfig,

    /// `[convert]` section.
    pub convert: ConvertConfig,
}

/// Path of the user's config file, if a config directory exists.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("domport").join("config.ini"))
}

impl ConfigFile {
    /// Load config from the default path.
    ///
    /// A missing file yields the defaults; a file that exists but cannot be
    /// parsed is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Err(ConfigError::NoConfigDir),
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config = Self::default();

        if let Some(root) = ini.get_from(Some("scan"), "root") {
            config.scan.root = PathBuf::from(root);
        }
        if let Some(prefix) = ini.get_from(Some("scan"), "prefix") {
            config.scan.prefix = prefix.to_string();
        }
        if let Some(command) = ini.get_from(Some("convert"), "command") {
            config.convert.command = command.to_string();
        }
        if let Some(parallel) = ini.get_from(Some("convert"), "parallel") {
            config.convert.parallel = parallel.parse().map_err(|_| ConfigError::InvalidValue {
                key: "convert.parallel".to_string(),
                value: parallel.to_string(),
            })?;
        }
        if let Some(timeout) = ini.get_from(Some("convert"), "timeout") {
            config.convert.timeout_secs =
                timeout.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "convert.timeout".to_string(),
                    value: timeout.to_string(),
                })?;
        }

        Ok(config)
    }

    /// Save config to the default path, creating parent directories.
    pub fn save(&self) -> Result<(), ConfigError> {
        match config_file_path() {
            Some(path) => self.save_to(&path),
            None => Err(ConfigError::NoConfigDir),
        }
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("scan"))
            .set("root", self.scan.root.to_string_lossy().to_string())
            .set("prefix", self.scan.prefix.clone());
        ini.with_section(Some("convert"))
            .set("command", self.convert.command.clone())
            .set("parallel", self.convert.parallel.to_string())
            .set("timeout", self.convert.timeout_secs.to_string());

        ini.write_to_file(path).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// A settable configuration key in `section.key` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// `scan.root`
    ScanRoot,
    /// `scan.prefix`
    ScanPrefix,
    /// `convert.command`
    ConvertCommand,
    /// `convert.parallel`
    ConvertParallel,
    /// `convert.timeout`
    ConvertTimeout,
}

impl ConfigKey {
    /// Every known key, for `config list`.
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::ScanRoot,
        ConfigKey::ScanPrefix,
        ConfigKey::ConvertCommand,
        ConfigKey::ConvertParallel,
        ConfigKey::ConvertTimeout,
    ];

    /// The `section.key` name of this key.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ScanRoot => "scan.root",
            ConfigKey::ScanPrefix => "scan.prefix",
            ConfigKey::ConvertCommand => "convert.command",
            ConfigKey::ConvertParallel => "convert.parallel",
            ConfigKey::ConvertTimeout => "convert.timeout",
        }
    }

    /// Read this key's current value as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ScanRoot => config.scan.root.to_string_lossy().to_string(),
            ConfigKey::ScanPrefix => config.scan.prefix.clone(),
            ConfigKey::ConvertCommand => config.convert.command.clone(),
            ConfigKey::ConvertParallel => config.convert.parallel.to_string(),
            ConfigKey::ConvertTimeout => config.convert.timeout_secs.to_string(),
        }
    }

    /// Set this key from a string value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
        };

        match self {
            ConfigKey::ScanRoot => config.scan.root = PathBuf::from(value),
            ConfigKey::ScanPrefix => config.scan.prefix = value.to_string(),
            ConfigKey::ConvertCommand => config.convert.command = value.to_string(),
            ConfigKey::ConvertParallel => {
                config.convert.parallel = value.parse().map_err(|_| invalid())?;
            }
            ConfigKey::ConvertTimeout => {
                config.convert.timeout_secs = value.parse().map_err(|_| invalid())?;
            }
        }

        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scan.root" => Ok(ConfigKey::ScanRoot),
            "scan.prefix" => Ok(ConfigKey::ScanPrefix),
            "convert.command" => Ok(ConfigKey::ConvertCommand),
            "convert.parallel" => Ok(ConfigKey::ConvertParallel),
            "convert.timeout" => Ok(ConfigKey::ConvertTimeout),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.scan.root, PathBuf::from(".."));
        assert_eq!(config.scan.prefix, DEFAULT_PREFIX);
        assert_eq!(config.convert.command, DEFAULT_CONVERTER);
        assert_eq!(config.convert.parallel, DEFAULT_PARALLEL);
        assert_eq!(config.convert.timeout_secs, 0);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("config.ini")).unwrap();

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("domport").join("config.ini");

        let mut config = ConfigFile::default();
        config.scan.root = PathBuf::from("/srv/sources");
        config.scan.prefix = "dombler-fx".to_string();
        config.convert.command = "/opt/java2ts/bin/java2ts".to_string();
        config.convert.parallel = 2;
        config.convert.timeout_secs = 900;

        config.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_bad_parallel() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[convert]\nparallel = lots\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_config_key_parse() {
        assert_eq!("scan.root".parse(), Ok(ConfigKey::ScanRoot));
        assert_eq!("convert.timeout".parse(), Ok(ConfigKey::ConvertTimeout));
        assert!("scan.bogus".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_config_key_get_set() {
        let mut config = ConfigFile::default();

        ConfigKey::ScanPrefix.set(&mut config, "dombler-fx").unwrap();
        assert_eq!(ConfigKey::ScanPrefix.get(&config), "dombler-fx");

        ConfigKey::ConvertParallel.set(&mut config, "8").unwrap();
        assert_eq!(config.convert.parallel, 8);

        let err = ConfigKey::ConvertParallel
            .set(&mut config, "many")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_key_names_round_trip() {
        for key in ConfigKey::ALL {
            assert_eq!(key.name().parse::<ConfigKey>(), Ok(key));
        }
    }
}
