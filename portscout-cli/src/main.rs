//! portscout CLI - list and connect to serial port candidates.
//!
//! ## Features
//!
//! - List resolved port candidates (plain or JSON)
//! - Connect to the first candidate that opens and remember it
//! - File bridge routing for hosts without direct device access
//! - Layered TOML configuration and environment variable support
//! - Shell completion generation

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use env_logger::Env;
use log::debug;
use portscout::{
    BridgeOpener, NativeOpener, PortDiscovery, PortOpener, PortResolver, RoutingOpener,
    bridged_resolver,
};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;

use config::Config;

/// Default baud rate when neither the command line nor config sets one.
const DEFAULT_BAUD: u32 = 115200;

/// Errors that map to specific exit codes.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    /// Invalid usage or missing setup (exit code 2).
    #[error("{0}")]
    Usage(String),
}

/// portscout - discover and order serial port candidates.
///
/// Environment variables:
///   PORTSCOUT_PORT              - Preferred (last used) port
///   PORTSCOUT_BAUD              - Baud rate for connecting
///   PORTSCOUT_ADDITIONAL_PORTS  - Comma-separated additional port globs
///   PORTSCOUT_BLACKLIST         - Comma-separated blacklist globs
#[derive(Parser)]
#[command(name = "portscout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Preferred port, tried first when present.
    #[arg(short, long, global = true, env = "PORTSCOUT_PORT")]
    port: Option<String>,

    /// Baud rate used when connecting.
    #[arg(short, long, global = true, env = "PORTSCOUT_BAUD")]
    baud: Option<u32>,

    /// Additional port glob (repeatable).
    #[arg(
        long = "additional-port",
        global = true,
        value_name = "GLOB",
        env = "PORTSCOUT_ADDITIONAL_PORTS",
        value_delimiter = ','
    )]
    additional_ports: Vec<String>,

    /// Blacklist glob (repeatable).
    #[arg(
        long = "blacklist",
        global = true,
        value_name = "GLOB",
        env = "PORTSCOUT_BLACKLIST",
        value_delimiter = ','
    )]
    blacklist: Vec<String>,

    /// Verbose output level (-v, -vv for increasing detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-essential output).
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file.
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List port candidates in the order they would be tried.
    List {
        /// Output the candidate list as JSON to stdout.
        #[arg(long)]
        json: bool,
    },

    /// Connect to the first candidate that opens.
    Connect {
        /// Save the connected port as the preferred port.
        #[arg(long)]
        remember: bool,
    },

    /// Show the effective configuration.
    Config {
        /// Print the global configuration file path instead.
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type for completions.
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Baud rate from the command line, then config, then the default.
    fn baud_rate(&self, config: &Config) -> u32 {
        self.baud
            .or(config.serial.baud)
            .unwrap_or(DEFAULT_BAUD)
    }
}

fn init_logging(cli: &Cli) {
    let log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(cli.verbose >= 2)
        .format_timestamp(if cli.verbose >= 2 {
            Some(env_logger::TimestampPrecision::Millis)
        } else {
            None
        })
        .init();
}

/// Load configuration and fold in command-line overrides.
fn load_config(cli: &Cli) -> Config {
    let mut config = if let Some(ref path) = cli.config_path {
        Config::load_from_path(path)
    } else {
        Config::load()
    };

    let discovery = config.discovery_mut();
    if let Some(port) = &cli.port {
        discovery.port = Some(port.clone());
    }
    discovery
        .additional_ports
        .extend(
            cli.additional_ports
                .iter()
                .cloned(),
        );
    discovery
        .blacklisted_ports
        .extend(
            cli.blacklist
                .iter()
                .cloned(),
        );

    config
}

/// Discovery strategy for this configuration.
pub(crate) fn build_discovery(config: &Config) -> Box<dyn PortDiscovery> {
    match config.bridge_paths() {
        Some((label, paths)) => {
            debug!("Bridge enabled as '{label}'");
            Box::new(bridged_resolver(&label, paths))
        },
        None => Box::new(PortResolver::for_platform()),
    }
}

/// Opening strategy for this configuration.
pub(crate) fn build_opener(config: &Config) -> Box<dyn PortOpener> {
    match config.bridge_paths() {
        Some((label, paths)) => Box::new(RoutingOpener::new(
            label,
            Box::new(BridgeOpener::new(paths)),
            Box::new(NativeOpener),
        )),
        None => Box::new(NativeOpener),
    }
}

fn run(cli: &Cli) -> Result<()> {
    if env::var("NO_COLOR").is_ok() || !console::Term::stderr().is_term() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    init_logging(cli);

    debug!(
        "portscout v{} (verbose level: {})",
        env!("CARGO_PKG_VERSION"),
        cli.verbose
    );

    let mut config = load_config(cli);

    match &cli.command {
        Commands::List { json } => commands::list::cmd_list(&config, *json),
        Commands::Connect { remember } => {
            commands::connect::cmd_connect(cli, &mut config, *remember)
        },
        Commands::Config { path } => commands::show_config::cmd_config(&config, *path),
        Commands::Completions { shell } => {
            commands::completions::cmd_completions(*shell);
            Ok(())
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            match err.downcast_ref::<CliError>() {
                Some(CliError::Usage(_)) => ExitCode::from(2),
                None => ExitCode::FAILURE,
            }
        },
    }
}
