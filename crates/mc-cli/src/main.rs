use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use mc_cli::commands::run::RunOptions;
use mc_cli::commands::{estimate, roles, run, util};
use mc_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout stays clean for JSON and the live status
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Roles { json }) => {
            let session = util::build_session(&config, &[], &[]);
            roles::run(
                &mut std::io::stdout(),
                session.catalog(),
                session.rate_overrides(),
                *json,
            )?;
        }
        Some(Commands::Estimate {
            attendees,
            rates,
            minutes,
            seconds,
            json,
        }) => {
            let seconds = match (minutes, seconds) {
                (Some(minutes), _) => minutes * 60.0,
                (None, Some(seconds)) => *seconds,
                (None, None) => bail!("either --minutes or --seconds is required"),
            };
            let session = util::build_session(&config, attendees, rates);
            estimate::run(&mut std::io::stdout(), &session, seconds, *json)?;
        }
        Some(Commands::Run {
            attendees,
            rates,
            ticks,
            output,
            paused,
        }) => {
            let session = util::build_session(&config, attendees, rates);
            let options = RunOptions {
                ticks: *ticks,
                output: output.clone(),
                paused: *paused,
                tick_interval: Duration::from_millis(config.tick_interval_ms),
                summary_path: config.summary_path.clone(),
            };
            run::run(session, &options)?;
        }
        None => {
            // No subcommand, show help
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
