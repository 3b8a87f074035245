//! Command-line argument definitions.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

/// Meeting cost timer.
///
/// Tracks what a meeting costs while it runs, based on who is in the room
/// and their hourly rates.
#[derive(Debug, Parser)]
#[command(name = "mct", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List attendee roles and their hourly rates.
    Roles {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Project the cost of a meeting without running the clock.
    Estimate {
        /// Attendees per role (repeatable), e.g. `individual_contributor=3`.
        #[arg(short, long = "attendee", value_name = "ROLE=COUNT", value_parser = parse_pair::<i64>)]
        attendees: Vec<(String, i64)>,

        /// Hourly rate override (repeatable), e.g. `senior_leader=300`.
        #[arg(long = "rate", value_name = "ROLE=RATE", value_parser = parse_pair::<f64>)]
        rates: Vec<(String, f64)>,

        /// Meeting length in minutes.
        #[arg(long, conflicts_with = "seconds", required_unless_present = "seconds")]
        minutes: Option<f64>,

        /// Meeting length in seconds.
        #[arg(long)]
        seconds: Option<f64>,

        /// Output the summary document as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run a live meeting clock, reading commands from stdin.
    ///
    /// Commands: start, pause, reset, +ROLE, -ROLE, set ROLE N, rate ROLE R,
    /// status, export [PATH], quit.
    Run {
        /// Attendees per role (repeatable), e.g. `leader_manager=1`.
        #[arg(short, long = "attendee", value_name = "ROLE=COUNT", value_parser = parse_pair::<i64>)]
        attendees: Vec<(String, i64)>,

        /// Hourly rate override (repeatable), e.g. `senior_leader=300`.
        #[arg(long = "rate", value_name = "ROLE=RATE", value_parser = parse_pair::<f64>)]
        rates: Vec<(String, f64)>,

        /// Stop after this many applied ticks.
        #[arg(long)]
        ticks: Option<u64>,

        /// Write the summary here when the session ends.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Start with the clock paused.
        #[arg(long)]
        paused: bool,
    },
}

/// Parses a `KEY=VALUE` argument.
pub fn parse_pair<T>(s: &str) -> Result<(String, T), String>
where
    T: FromStr,
    T::Err: Display,
{
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ROLE=VALUE, got `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing role id in `{s}`"));
    }
    let value = value
        .trim()
        .parse::<T>()
        .map_err(|e| format!("invalid value for `{key}`: {e}"))?;
    Ok((key.to_string(), value))
}
