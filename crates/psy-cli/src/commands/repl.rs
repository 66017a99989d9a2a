//! Line-buffered shell session over stdin.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use console::style;
use psy_cleaner::CodeCleaner;
use tracing::{info, warn};

use crate::cli::{CliConfig, ReplConfig};
use crate::commands::common::{build_cleaner, read_source, report_clean_error, Input};
use crate::diagnostics::render_clean_error;
use crate::{CliError, Result};

#[derive(Debug, Clone, Default, Args)]
pub struct ReplArgs {
    /// Snippet files to clean before reading stdin
    #[arg(short, long)]
    pub load: Vec<PathBuf>,
}

/// What one line of input did to the session.
#[derive(Debug)]
pub enum LineOutcome {
    /// More lines are needed before the snippet can be cleaned.
    Incomplete,
    Cleaned(String),
    Rejected { source: String, error: psy_core::Error },
}

pub struct ReplSession<'a> {
    cleaner: CodeCleaner,
    config: &'a ReplConfig,
    interactive: bool,
    buffer: Vec<String>,
}

impl<'a> ReplSession<'a> {
    pub fn new(cleaner: CodeCleaner, config: &'a ReplConfig, interactive: bool) -> Self {
        Self {
            cleaner,
            config,
            interactive,
            buffer: Vec::new(),
        }
    }

    pub fn cleaner(&self) -> &CodeCleaner {
        &self.cleaner
    }

    pub fn prompt(&self) -> String {
        let prompt = if self.buffer.is_empty() {
            &self.config.prompt
        } else {
            &self.config.continuation_prompt
        };
        match self.cleaner.namespace() {
            Some(namespace) if self.config.show_namespace => format!("{} {}", namespace, prompt),
            _ => prompt.clone(),
        }
    }

    /// Add a line to the pending snippet and try to clean it.
    pub fn feed(&mut self, line: &str) -> LineOutcome {
        self.buffer.push(line.to_string());
        match self.cleaner.clean(&self.buffer) {
            Ok(None) => LineOutcome::Incomplete,
            Ok(Some(code)) => {
                self.buffer.clear();
                LineOutcome::Cleaned(code)
            }
            Err(error) => {
                let source = self.buffer.join("\n");
                self.buffer.clear();
                LineOutcome::Rejected { source, error }
            }
        }
    }

    /// Run until `input` ends. Returns the number of rejected snippets.
    pub fn run<R, O, E>(&mut self, input: R, out: &mut O, err: &mut E) -> Result<usize>
    where
        R: BufRead,
        O: Write,
        E: Write,
    {
        let mut rejected = 0;
        self.show_prompt(err)?;
        for line in input.lines() {
            match self.feed(&line?) {
                LineOutcome::Incomplete => {}
                LineOutcome::Cleaned(code) => writeln!(out, "{}", code)?,
                LineOutcome::Rejected { source, error } => {
                    rejected += 1;
                    writeln!(err, "{}", render_clean_error("stdin", &source, &error))?;
                }
            }
            self.show_prompt(err)?;
        }
        if !self.buffer.is_empty() {
            warn!(lines = self.buffer.len(), "discarding incomplete snippet at end of input");
        }
        Ok(rejected)
    }

    fn show_prompt<E: Write>(&self, err: &mut E) -> Result<()> {
        if self.interactive {
            write!(err, "{}", style(self.prompt()).green())?;
            err.flush()?;
        }
        Ok(())
    }
}

/// Clean stdin line by line, like the interactive shell would.
pub fn repl_command(args: ReplArgs, config: &CliConfig) -> Result<()> {
    let mut cleaner = build_cleaner(config)?;
    for path in &args.load {
        let input = Input {
            name: path.display().to_string(),
            source: read_source(path)?,
        };
        let lines: Vec<&str> = input.source.lines().collect();
        match cleaner.clean(&lines) {
            Ok(Some(_)) => info!(path = %input.name, "loaded"),
            Ok(None) => {
                return Err(CliError::InvalidInput(format!(
                    "{}: unexpected end of input",
                    input.name
                )))
            }
            Err(err) => {
                report_clean_error(&input, &err);
                return Err(CliError::Rejected(1));
            }
        }
    }

    let mut session = ReplSession::new(cleaner, &config.repl, console::user_attended());
    let stdin = std::io::stdin();
    let rejected = session.run(stdin.lock(), &mut std::io::stdout(), &mut std::io::stderr())?;
    info!(rejected, "session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session(config: &ReplConfig) -> ReplSession<'_> {
        ReplSession::new(CodeCleaner::new().unwrap(), config, false)
    }

    #[test]
    fn snippets_span_lines_until_complete() {
        let config = ReplConfig::default();
        let mut session = session(&config);
        assert!(matches!(session.feed("if (true) {"), LineOutcome::Incomplete));
        assert_eq!(session.prompt(), ". ");
        match session.feed("1; }") {
            LineOutcome::Cleaned(code) => assert!(code.contains("return 1;"), "{}", code),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(session.prompt(), "> ");
    }

    #[test]
    fn rejected_snippets_reset_the_buffer() {
        let config = ReplConfig::default();
        let mut session = session(&config);
        match session.feed("new Missing();") {
            LineOutcome::Rejected { source, error } => {
                assert_eq!(source, "new Missing();");
                assert_eq!(error.message(), "Class 'Missing' not found");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(session.feed("2"), LineOutcome::Cleaned(_)));
    }

    #[test]
    fn prompt_shows_the_namespace() {
        let config = ReplConfig::default();
        let mut session = session(&config);
        session.feed("namespace App;");
        assert_eq!(session.prompt(), "App > ");

        let hidden = ReplConfig {
            show_namespace: false,
            ..ReplConfig::default()
        };
        let mut session = self::session(&hidden);
        session.feed("namespace App;");
        assert_eq!(session.prompt(), "> ");
    }

    #[test]
    fn run_writes_code_and_errors_apart() {
        let config = ReplConfig::default();
        let mut session = session(&config);
        let input = "$a = 1\nnew Missing();\n$a\n";
        let mut out = Vec::new();
        let mut err = Vec::new();
        let rejected = session.run(input.as_bytes(), &mut out, &mut err).unwrap();
        assert_eq!(rejected, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "return $a = 1;\nreturn $a;\n");
        assert!(String::from_utf8(err).unwrap().contains("Class 'Missing' not found"));
    }
}
