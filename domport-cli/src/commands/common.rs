//! Shared helpers for CLI commands.

use std::path::PathBuf;

use domport::config::ConfigFile;
use domport::discovery::PackageDiscovery;

/// Build a discovery from CLI flags overlaid on the config file.
///
/// Resolution order for each setting: CLI flag > config file > default.
pub fn resolve_discovery(
    root: Option<PathBuf>,
    prefix: Option<String>,
    config: &ConfigFile,
) -> PackageDiscovery {
    let root = root.unwrap_or_else(|| config.scan.root.clone());
    let prefix = prefix.unwrap_or_else(|| config.scan.prefix.clone());

    PackageDiscovery::new(root, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_flags_override_config() {
        let mut config = ConfigFile::default();
        config.scan.root = PathBuf::from("/from/config");
        config.scan.prefix = "config-prefix".to_string();

        let discovery = resolve_discovery(
            Some(PathBuf::from("/from/flag")),
            Some("flag-prefix".to_string()),
            &config,
        );

        assert_eq!(discovery.scan_root(), Path::new("/from/flag"));
        assert_eq!(discovery.filter().prefix(), "flag-prefix");
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let mut config = ConfigFile::default();
        config.scan.root = PathBuf::from("/from/config");

        let discovery = resolve_discovery(None, None, &config);

        assert_eq!(discovery.scan_root(), Path::new("/from/config"));
        assert_eq!(discovery.filter().prefix(), domport::DEFAULT_PREFIX);
    }
}
