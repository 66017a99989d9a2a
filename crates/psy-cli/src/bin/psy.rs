//! The `psy` binary.
//!
//! Runs PHP snippets through the shell's code cleaner and prints the code that
//! would be evaluated, or the error the shell would show instead.
//!
//! ```bash
//! psy clean --expr '$a = 1'                         # one snippet
//! psy clean setup.php snippet.php                   # files, one session
//! printf 'namespace App;\nnew Foo;\n' | psy repl    # line by line
//! psy parse --expr 'if ($a) { 1; }' --show-lines    # tree, no cleaning
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use psy_cli::cli::CliConfig;
use psy_cli::commands::{
    self, clean::CleanArgs, parse::ParseArgs, repl::ReplArgs, symbols::SymbolsArgs,
};
use psy_cli::diagnostics::{render_cli_error, setup_error_reporting};
use psy_cli::Result;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "psy",
    version = env!("CARGO_PKG_VERSION"),
    about = "psy: the PHP shell's code cleaner on the command line",
    long_about = r#"
Validates and rewrites PHP snippets the way an interactive PHP shell does before
evaluating them, carrying namespace, use aliases, strict types and declared
symbols from one snippet to the next.

Examples:
    psy clean --expr '4'                 # return 4;
    psy clean a.php b.php                # clean files as one session
    psy repl < session.txt               # clean stdin line by line
    psy parse --expr '$a = 1;' --json    # dump the syntax tree
"#
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    logging: LoggingArgs,

    /// Read settings from this TOML file instead of psysh.toml
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Change to this directory before doing anything else
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    chdir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Clean snippets and print the code the shell would run
    Clean(CleanArgs),
    /// Clean stdin line by line like an interactive session
    Repl(ReplArgs),
    /// Parse code and print it back without cleaning
    Parse(ParseArgs),
    /// Dump the symbol snapshot used for name checks
    Symbols(SymbolsArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
struct LoggingArgs {
    /// More log output; repeat for more
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Exact log level, wins over -v and -q
    #[arg(long, global = true, value_name = "LEVEL")]
    log: Option<LevelFilter>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl LoggingArgs {
    fn level(&self) -> LevelFilter {
        if let Some(level) = self.log {
            return level;
        }
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Install the global subscriber. Cleaned code owns stdout, so logs go to stderr.
    fn init(&self) {
        let filter = EnvFilter::default().add_directive(self.level().into());
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time();
        let registry = tracing_subscriber::registry().with(filter);
        match self.log_format {
            LogFormat::Pretty => registry.with(layer).init(),
            LogFormat::Json => registry.with(layer.json()).init(),
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(dir) = &cli.chdir {
        std::env::set_current_dir(dir)?;
    }
    let config = CliConfig::load(cli.config.as_deref())?;
    debug!(?config, "effective configuration");

    match cli.command {
        Command::Clean(args) => commands::clean_command(args, &config),
        Command::Repl(args) => commands::repl_command(args, &config),
        Command::Parse(args) => commands::parse_command(args, &config),
        Command::Symbols(args) => commands::symbols_command(args, &config),
        Command::Config => commands::config_command(&config),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_error_reporting()?;
    cli.logging.init();

    if let Err(err) = run(cli) {
        if !render_cli_error(&err) {
            error!("{}", err);
        }
        debug!(?err, "command failed");
        std::process::exit(1);
    }
    Ok(())
}
