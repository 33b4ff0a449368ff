//! Connect command implementation.

use {
    crate::{Cli, CliError, build_discovery, build_opener, config::Config},
    anyhow::{Context, Result},
    console::style,
    log::debug,
    portscout::{ConnectOptions, Error, connect_first},
};

/// Resolve candidates, open the first that works and report it.
///
/// The connected port name is printed to stdout so scripts can use it.
pub(crate) fn cmd_connect(cli: &Cli, config: &mut Config, remember: bool) -> Result<()> {
    let discovery = build_discovery(config);
    let candidates = discovery.candidates(config.discovery());
    let baud = cli.baud_rate(config);
    let opener = build_opener(config);

    if !cli.quiet {
        eprintln!(
            "{} Trying {} candidate(s) at {} baud",
            style("🔌").cyan(),
            candidates.len(),
            baud
        );
    }

    let mut port = match connect_first(
        &candidates,
        ConnectOptions::with_baud(baud),
        opener.as_ref(),
    ) {
        Ok(port) => port,
        Err(e @ Error::NoCandidates) => return Err(CliError::Usage(e.to_string()).into()),
        Err(e) => return Err(e).context("Failed to connect to any candidate port"),
    };

    let name = port
        .name()
        .to_string();
    debug!("Releasing {name}");
    port.close()?;

    if !cli.quiet {
        eprintln!(
            "{} Connected to {}",
            style("✓").green(),
            style(&name).cyan().bold()
        );
    }
    println!("{name}");

    if remember {
        let path = config
            .remember_port(&name)
            .context("Failed to save the connected port")?;
        if !cli.quiet {
            eprintln!(
                "{} Remembered {} in {}",
                style("✓").green(),
                name,
                path.display()
            );
        }
    }

    Ok(())
}
