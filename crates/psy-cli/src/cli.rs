//! CLI configuration and settings management

use std::path::{Path, PathBuf};

use psy_cleaner::config::DEFAULT_CONFIG_FILE;
use psy_cleaner::CleanerConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CliError, Result};

/// CLI configuration: the cleaner settings plus front-end options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(flatten)]
    pub cleaner: CleanerConfig,

    /// Interactive session settings
    pub repl: ReplConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Prompt shown before a new snippet
    pub prompt: String,

    /// Prompt shown while a snippet is incomplete
    pub continuation_prompt: String,

    /// Prefix the prompt with the current namespace
    pub show_namespace: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            continuation_prompt: ". ".to_string(),
            show_namespace: true,
        }
    }
}

impl CliConfig {
    /// Load from `path`, or the first existing default location, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_paths().into_iter().find(|path| path.is_file()),
        };
        let config = match path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    /// `psysh.toml` in the working directory, then the user config directory.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("psysh").join(DEFAULT_CONFIG_FILE));
        }
        paths
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), "loaded config");
        toml::from_str(&content).map_err(|e| {
            CliError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e.message()
            ))
        })
    }

    pub fn with_env_overrides(mut self) -> Result<Self> {
        self.cleaner = self.cleaner.with_env_overrides()?;
        Ok(self)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use psy_cleaner::PhpVersion;

    #[test]
    fn cleaner_settings_sit_at_the_top_level() {
        let config: CliConfig = toml::from_str(
            r#"
php_version = "7.2"

[implicit_use]
include_namespaces = ["App"]

[repl]
prompt = "psy> "
"#,
        )
        .unwrap();
        assert_eq!(config.cleaner.php_version, PhpVersion::new(7, 2));
        assert_eq!(config.cleaner.implicit_use.include_namespaces, vec!["App".to_string()]);
        assert_eq!(config.repl.prompt, "psy> ");
        assert_eq!(config.repl.continuation_prompt, ". ");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)), "{}", err);
    }

    #[test]
    fn reloads_what_it_writes() {
        let config = CliConfig {
            cleaner: CleanerConfig {
                php_version: PhpVersion::new(7, 4),
                require_semicolons: true,
                ..CleanerConfig::default()
            },
            repl: ReplConfig {
                show_namespace: false,
                ..ReplConfig::default()
            },
        };
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), config.to_toml_string().unwrap()).unwrap();
        assert_eq!(CliConfig::load_from_file(file.path()).unwrap(), config);
    }
}
