use std::path::PathBuf;

use clap::Args;
use psy_cleaner::cleaner::default_symbols;
use tracing::info;

use crate::cli::CliConfig;
use crate::Result;

#[derive(Debug, Clone, Args)]
pub struct SymbolsArgs {
    /// Write the snapshot to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Dump the symbol snapshot the cleaner checks names against.
pub fn symbols_command(args: SymbolsArgs, config: &CliConfig) -> Result<()> {
    let symbols = default_symbols(&config.cleaner)?;
    let json = symbols.to_json()?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!(path = %path.display(), count = symbols.len(), "wrote symbol snapshot");
        }
        None => println!("{}", json),
    }
    Ok(())
}
