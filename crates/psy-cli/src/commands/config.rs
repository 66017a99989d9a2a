use crate::cli::CliConfig;
use crate::Result;

/// Print the effective configuration as TOML.
pub fn config_command(config: &CliConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
