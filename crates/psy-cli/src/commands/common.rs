//! Helpers shared by the commands.

use std::path::{Path, PathBuf};

use console::style;
use eyre::WrapErr;
use psy_cleaner::CodeCleaner;

use crate::cli::CliConfig;
use crate::diagnostics::render_clean_error;
use crate::{CliError, Result};

/// One named piece of source to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub name: String,
    pub source: String,
}

/// A cleaner configured from the CLI config. Generated `use` statements are
/// echoed to stderr the way the shell shows them.
pub fn build_cleaner(config: &CliConfig) -> Result<CodeCleaner> {
    let cleaner = CodeCleaner::builder()
        .config(config.cleaner.clone())
        .logger(|message| eprintln!("{}", style(message).dim()))
        .build()?;
    Ok(cleaner)
}

pub fn read_source(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read file {}", path.display()))?;
    Ok(source)
}

/// `--expr` or the listed files, never both.
pub fn collect_inputs(expr: Option<String>, files: &[PathBuf]) -> Result<Vec<Input>> {
    match expr {
        Some(_) if !files.is_empty() => Err(CliError::InvalidInput(
            "Cannot specify both --expr and file paths".to_string(),
        )),
        Some(source) => Ok(vec![Input {
            name: "expr".to_string(),
            source,
        }]),
        None if files.is_empty() => Err(CliError::InvalidInput(
            "Must specify either --expr or at least one path".to_string(),
        )),
        None => files
            .iter()
            .map(|path| -> Result<Input> {
                Ok(Input {
                    name: path.display().to_string(),
                    source: read_source(path)?,
                })
            })
            .collect(),
    }
}

pub fn report_clean_error(input: &Input, err: &psy_core::Error) {
    eprintln!("{}", render_clean_error(&input.name, &input.source, err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expr_and_files_are_exclusive() {
        let err = collect_inputs(Some("1".into()), &[PathBuf::from("a.php")]).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert!(matches!(collect_inputs(None, &[]), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn files_are_read_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.php");
        let second = dir.path().join("second.php");
        std::fs::write(&first, "1;").unwrap();
        std::fs::write(&second, "2;").unwrap();
        let inputs = collect_inputs(None, &[first, second]).unwrap();
        let sources: Vec<&str> = inputs.iter().map(|input| input.source.as_str()).collect();
        assert_eq!(sources, vec!["1;", "2;"]);
    }

    #[test]
    fn unreadable_files_name_the_path() {
        let err = read_source(Path::new("/definitely/not/here.php")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.php"), "{}", err);
    }
}
