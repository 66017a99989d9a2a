use std::path::PathBuf;

use clap::Args;
use tracing::{debug, info};

use crate::cli::CliConfig;
use crate::commands::common::{build_cleaner, collect_inputs, report_clean_error};
use crate::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct CleanArgs {
    /// Code to clean
    #[arg(short, long)]
    pub expr: Option<String>,

    /// Snippet files, cleaned in order as one shell session
    pub files: Vec<PathBuf>,

    /// Keep cleaning after a snippet is rejected
    #[arg(long)]
    pub keep_going: bool,
}

/// Clean each input as one snippet and print the code the shell would run.
pub fn clean_command(args: CleanArgs, config: &CliConfig) -> Result<()> {
    let inputs = collect_inputs(args.expr, &args.files)?;
    let mut cleaner = build_cleaner(config)?;
    let mut rejected = 0;

    for input in &inputs {
        debug!(input = %input.name, "cleaning");
        let lines: Vec<&str> = input.source.lines().collect();
        match cleaner.clean(&lines) {
            Ok(Some(code)) => println!("{}", code),
            Ok(None) => {
                return Err(CliError::InvalidInput(format!(
                    "{}: unexpected end of input",
                    input.name
                )))
            }
            Err(err) => {
                report_clean_error(input, &err);
                rejected += 1;
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    if let Some(namespace) = cleaner.namespace() {
        info!(namespace = %namespace, "session ended inside a namespace");
    }
    if rejected > 0 {
        return Err(CliError::Rejected(rejected));
    }
    Ok(())
}
