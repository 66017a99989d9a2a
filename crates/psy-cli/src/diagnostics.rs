//! Diagnostic and error reporting utilities

use miette::{Diagnostic, NamedSource, SourceSpan};
use psy_core::error::ErrorKind;
use thiserror::Error;

use crate::{CliError, Result};

/// Set up enhanced error reporting with miette
pub fn setup_error_reporting() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .map_err(|e| CliError::Config(format!("Failed to setup error reporting: {}", e)))?;

    Ok(())
}

/// A rejected snippet, pointing at the offending line.
#[derive(Error, Debug, Diagnostic)]
pub enum CleanDiagnostic {
    #[error("PHP Parse error:  {message}")]
    #[diagnostic(code(psysh::parse_error))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("PHP Fatal error:  {message}")]
    #[diagnostic(
        code(psysh::fatal_error),
        help("PHP would abort the shell on this, so the snippet was not run")
    )]
    Fatal {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("PHP Warning:  {message}")]
    #[diagnostic(code(psysh::warning))]
    Warning {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },
}

/// Byte range of the 1-based `line` in `source`.
pub fn line_span(source: &str, line: u32) -> Option<SourceSpan> {
    let index = usize::try_from(line).ok()?.checked_sub(1)?;
    let mut offset = 0;
    for (current, text) in source.split('\n').enumerate() {
        if current == index {
            return Some(SourceSpan::from((offset, text.len())));
        }
        offset += text.len() + 1;
    }
    None
}

/// The diagnostic for a validation error, `None` for internal failures.
pub fn clean_diagnostic(name: &str, source: &str, err: &psy_core::Error) -> Option<CleanDiagnostic> {
    let validation = err.as_validation()?;
    let message = validation.message.clone();
    let src = NamedSource::new(name, source.to_string());
    let span = line_span(source, validation.line);
    Some(match validation.kind {
        ErrorKind::Parse => CleanDiagnostic::Parse { message, src, span },
        ErrorKind::Fatal => CleanDiagnostic::Fatal { message, src, span },
        ErrorKind::Warning => CleanDiagnostic::Warning { message, src, span },
    })
}

/// Render a cleaner error against the source it came from.
pub fn render_clean_error(name: &str, source: &str, err: &psy_core::Error) -> String {
    match clean_diagnostic(name, source, err) {
        Some(diagnostic) => format!("{:?}", miette::Report::new(diagnostic)),
        None => err.to_string(),
    }
}

/// Print errors that carry their own presentation. Returns `false` when the
/// caller should log the error instead.
pub fn render_cli_error(err: &CliError) -> bool {
    match err {
        CliError::Rejected(_) => true,
        CliError::Clean(err) => {
            eprintln!("{}", err);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spans_cover_whole_lines() {
        let source = "$a = 1;\nnew Missing();\n";
        assert_eq!(line_span(source, 1), Some(SourceSpan::from((0, 7))));
        assert_eq!(line_span(source, 2), Some(SourceSpan::from((8, 14))));
        assert_eq!(line_span(source, 0), None);
        assert_eq!(line_span(source, 9), None);
    }

    #[test]
    fn only_validation_errors_become_diagnostics() {
        let source = "new Missing();";
        let fatal = psy_core::Error::fatal("Class 'Missing' not found", 1);
        let diagnostic = clean_diagnostic("snippet", source, &fatal).unwrap();
        assert!(matches!(diagnostic, CleanDiagnostic::Fatal { .. }));
        assert_eq!(diagnostic.to_string(), "PHP Fatal error:  Class 'Missing' not found");

        let internal = psy_core::Error::internal("broken");
        assert!(clean_diagnostic("snippet", source, &internal).is_none());
        assert_eq!(render_clean_error("snippet", source, &internal), "Internal error: broken");
    }
}
