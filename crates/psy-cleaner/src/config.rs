//! Cleaner configuration loaded from TOML.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use psy_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "psysh.toml";
/// Overrides [`CleanerConfig::php_version`].
pub const PHP_VERSION_ENV: &str = "PSYSH_PHP_VERSION";

/// Target PHP version. Several checks only apply to older releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhpVersion {
    pub major: u32,
    pub minor: u32,
}

impl PhpVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        *self >= PhpVersion::new(major, minor)
    }
}

impl Default for PhpVersion {
    fn default() -> Self {
        PhpVersion::new(8, 3)
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PhpVersion {
    type Err = Error;

    /// Accepts `8`, `8.1` and `8.1.27`; the patch level is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('.');
        let parse = |part: Option<&str>| -> Result<u32> {
            match part {
                None => Ok(0),
                Some(part) => part
                    .parse()
                    .map_err(|_| Error::Generic(format!("Invalid PHP version: {}", s))),
            }
        };
        let major = match parts.next() {
            Some(major) if !major.is_empty() => parse(Some(major))?,
            _ => return Err(Error::Generic(format!("Invalid PHP version: {}", s))),
        };
        let minor = parse(parts.next())?;
        Ok(PhpVersion::new(major, minor))
    }
}

impl TryFrom<String> for PhpVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PhpVersion> for String {
    fn from(version: PhpVersion) -> Self {
        version.to_string()
    }
}

/// Namespaces the implicit-use pass may import short class names from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImplicitUseConfig {
    pub include_namespaces: Vec<String>,
    pub exclude_namespaces: Vec<String>,
}

impl ImplicitUseConfig {
    pub fn is_enabled(&self) -> bool {
        !self.include_namespaces.is_empty() || !self.exclude_namespaces.is_empty()
    }
}

/// Settings for resolving `require` targets at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequireConfig {
    /// Equivalent of PHP's `include_path`.
    pub include_path: Vec<PathBuf>,
    /// Path of the bundle the shell runs from, if any.
    pub bundle_path: Option<PathBuf>,
    /// Report an empty filename as a warning before failing.
    pub report_warnings: bool,
}

impl Default for RequireConfig {
    fn default() -> Self {
        Self {
            include_path: vec![PathBuf::from(".")],
            bundle_path: None,
            report_warnings: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub php_version: PhpVersion,
    /// Never retry a snippet with an implicit trailing `;`.
    pub require_semicolons: bool,
    /// Extra symbol snapshots (JSON) layered over the bundled builtins.
    pub symbols: Vec<PathBuf>,
    pub implicit_use: ImplicitUseConfig,
    pub require: RequireConfig,
}

impl CleanerConfig {
    /// Load from `path`, or from `psysh.toml` in the working directory, or defaults.
    /// The `PSYSH_PHP_VERSION` environment variable wins over the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::load_from_file(local)?
                } else {
                    Self::default()
                }
            }
        };
        config.with_env_overrides()
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Generic(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), "loaded cleaner config");
        Self::from_toml_str(&content).map_err(|e| {
            Error::Generic(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e.message()
            ))
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Generic(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Generic(e.to_string()))
    }

    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(version) = std::env::var(PHP_VERSION_ENV) {
            self.php_version = version.parse()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_versions() {
        assert_eq!("7.2".parse::<PhpVersion>().unwrap(), PhpVersion::new(7, 2));
        assert_eq!("8".parse::<PhpVersion>().unwrap(), PhpVersion::new(8, 0));
        assert_eq!("5.4.45".parse::<PhpVersion>().unwrap(), PhpVersion::new(5, 4));
        assert!("eight".parse::<PhpVersion>().is_err());
        assert!(PhpVersion::new(7, 3).at_least(7, 3));
        assert!(!PhpVersion::new(7, 2).at_least(7, 3));
    }

    #[test]
    fn reads_partial_toml() {
        let config = CleanerConfig::from_toml_str(
            r#"
php_version = "7.1"
require_semicolons = true

[implicit_use]
include_namespaces = ["App\\Models"]
"#,
        )
        .unwrap();
        assert_eq!(config.php_version, PhpVersion::new(7, 1));
        assert!(config.require_semicolons);
        assert!(config.implicit_use.is_enabled());
        assert_eq!(config.require, RequireConfig::default());
    }

    #[test]
    fn toml_roundtrip_through_file() {
        let config = CleanerConfig {
            php_version: PhpVersion::new(7, 4),
            ..CleanerConfig::default()
        };
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), config.to_toml_string().unwrap()).unwrap();
        let loaded = CleanerConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }
}
