//! Effective configuration output.

use {
    crate::{CliError, config::Config},
    anyhow::{Context, Result},
};

/// Print the effective configuration as TOML, or the global config path.
pub(crate) fn cmd_config(config: &Config, path_only: bool) -> Result<()> {
    if path_only {
        let path = Config::global_config_path().ok_or_else(|| {
            CliError::Usage("Cannot determine the configuration directory".to_string())
        })?;
        println!("{}", path.display());
        return Ok(());
    }

    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}
