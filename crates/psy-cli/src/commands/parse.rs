use std::path::PathBuf;

use clap::Args;
use psy_core::pretty::PrettyOptions;
use psy_core::printer::print_with;

use crate::cli::CliConfig;
use crate::commands::common::{collect_inputs, report_clean_error};
use crate::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct ParseArgs {
    /// Code to parse
    #[arg(short, long)]
    pub expr: Option<String>,

    /// Files containing code to parse
    pub files: Vec<PathBuf>,

    /// Print the syntax tree as JSON instead of code
    #[arg(long)]
    pub json: bool,

    /// Mark each printed statement with its source line
    #[arg(long)]
    pub show_lines: bool,
}

/// Parse without cleaning and print the tree back.
pub fn parse_command(args: ParseArgs, _config: &CliConfig) -> Result<()> {
    let inputs = collect_inputs(args.expr, &args.files)?;
    let options = PrettyOptions {
        show_lines: args.show_lines,
        ..PrettyOptions::default()
    };
    let mut rejected = 0;

    for input in &inputs {
        let stmts = match psy_lang::parse(&input.source) {
            Ok(stmts) => stmts,
            Err(err) => {
                let err: psy_core::Error = err.into();
                report_clean_error(input, &err);
                rejected += 1;
                continue;
            }
        };
        if inputs.len() > 1 {
            println!("File {}:", input.name);
        }
        if args.json {
            println!("{}", serde_json::to_string_pretty(&stmts)?);
        } else {
            println!("{}", print_with(&stmts, &options));
        }
    }

    if rejected > 0 {
        return Err(CliError::Rejected(rejected));
    }
    Ok(())
}
