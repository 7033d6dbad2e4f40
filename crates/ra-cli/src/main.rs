use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ra_cli::commands::{grid, run, validate};
use ra_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so that `--json` output stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Run {
            snapshot,
            json,
            timetable,
        }) => {
            let format = if *json {
                run::OutputFormat::Json
            } else if *timetable {
                run::OutputFormat::Timetable
            } else {
                run::OutputFormat::Table
            };
            run::run(&mut stdout, snapshot, &config, format)?;
        }
        Some(Commands::Validate { snapshot }) => {
            validate::run(&mut stdout, snapshot, &config)?;
        }
        Some(Commands::Grid) => {
            grid::run(&mut stdout, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
