//! Runtime side of the `require` rewrite: where a guarded `require` target
//! actually resolves to.

use std::path::{Path, PathBuf};

use psy_core::{bail_fatal, bail_warning, Result};
use tracing::debug;

use crate::config::RequireConfig;

#[derive(Debug, Clone, Default)]
pub struct RequireResolver {
    include_path: Vec<PathBuf>,
    bundle_path: Option<PathBuf>,
    report_warnings: bool,
}

impl RequireResolver {
    pub fn new(include_path: Vec<PathBuf>) -> Self {
        Self {
            include_path,
            bundle_path: None,
            report_warnings: true,
        }
    }

    pub fn from_config(config: &RequireConfig) -> Self {
        Self {
            include_path: config.include_path.clone(),
            bundle_path: config.bundle_path.clone(),
            report_warnings: config.report_warnings,
        }
    }

    pub fn with_bundle_path(mut self, bundle_path: impl Into<PathBuf>) -> Self {
        self.bundle_path = Some(bundle_path.into());
        self
    }

    /// Explicitly relative or absolute paths resolve as given; anything else is
    /// searched along the include path first.
    fn resolve_include_path(&self, file: &str) -> Option<PathBuf> {
        let path = Path::new(file);
        let explicit = path.is_absolute() || file.starts_with("./") || file.starts_with("../");
        if !explicit {
            if let Some(found) = self
                .include_path
                .iter()
                .map(|prefix| prefix.join(path))
                .find(|candidate| candidate.is_file())
            {
                return Some(found);
            }
        }
        path.is_file().then(|| path.to_path_buf())
    }

    /// A relative path that also names a file inside the running bundle would
    /// load the bundled copy; prefer the include path instead.
    fn bundle_collision(&self, file: &str) -> Option<PathBuf> {
        let bundle = self.bundle_path.as_ref()?;
        if file.starts_with('.') || !bundle.to_string_lossy().contains("psysh") {
            return None;
        }
        if !bundle.join(file).is_file() {
            return None;
        }
        self.include_path
            .iter()
            .map(|prefix| prefix.join(file))
            .find(|candidate| candidate.is_file())
    }

    pub fn resolve(&self, file: &str, line: u32) -> Result<String> {
        if file.is_empty() && self.report_warnings {
            bail_warning!(line, "Filename cannot be empty");
        }
        let Some(resolved) = (!file.is_empty())
            .then(|| self.resolve_include_path(file))
            .flatten()
        else {
            bail_fatal!(line, "Failed opening required '{}'", file);
        };
        if resolved != Path::new(file) {
            if let Some(local) = self.bundle_collision(file) {
                debug!(file, resolved = %local.display(), "avoiding bundled file");
                return Ok(local.to_string_lossy().into_owned());
            }
        }
        Ok(file.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psy_core::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn empty_filename() {
        let resolver = RequireResolver::new(vec![]);
        let err = resolver.resolve("", 3).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Warning));
        assert_eq!(err.message(), "Filename cannot be empty");

        let quiet = RequireResolver::from_config(&RequireConfig {
            report_warnings: false,
            ..RequireConfig::default()
        });
        let err = quiet.resolve("", 3).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Fatal));
        assert_eq!(err.message(), "Failed opening required ''");
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = RequireResolver::new(vec![dir.path().to_path_buf()]);
        let err = resolver.resolve("not-there.php", 1).unwrap_err();
        assert_eq!(err.message(), "Failed opening required 'not-there.php'");
    }

    #[test]
    fn found_files_resolve_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lib.php"), "<?php").unwrap();
        let resolver = RequireResolver::new(vec![dir.path().to_path_buf()]);
        assert_eq!(resolver.resolve("lib.php", 1).unwrap(), "lib.php");

        let absolute = dir.path().join("lib.php");
        let absolute = absolute.to_string_lossy();
        assert_eq!(resolver.resolve(&absolute, 1).unwrap(), absolute);
    }

    #[test]
    fn bundled_collision_prefers_include_path() {
        let include = tempfile::tempdir().unwrap();
        let bundle_root = tempfile::tempdir().unwrap();
        let bundle = bundle_root.path().join("psysh");
        fs::create_dir_all(bundle.join("src")).unwrap();
        fs::write(bundle.join("src/config.php"), "<?php").unwrap();
        fs::create_dir_all(include.path().join("src")).unwrap();
        fs::write(include.path().join("src/config.php"), "<?php").unwrap();

        let resolver =
            RequireResolver::new(vec![include.path().to_path_buf()]).with_bundle_path(&bundle);
        let expected = include.path().join("src/config.php");
        assert_eq!(
            resolver.resolve("src/config.php", 1).unwrap(),
            expected.to_string_lossy()
        );
    }
}
