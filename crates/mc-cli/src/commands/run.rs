//! Run command: a live meeting clock driven by wall-clock ticks.
//!
//! Ticks and stdin commands share one [`SessionController`] behind a mutex.
//! Each tick and each command holds the lock for its whole mutation, so a
//! `pause` typed at the prompt stops every later tick.

use std::io::Write;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};

use mc_core::clock::lock;
use mc_core::{CostError, DriveStats, SessionController, SharedSession, drive};

use super::export::write_summary;
use super::util::{format_currency, format_elapsed, format_rate_breakdown, format_status};
use crate::ticker::IntervalTicks;

/// Options for a live session.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop after this many applied ticks.
    pub ticks: Option<u64>,
    /// Summary destination written when the session ends.
    pub output: Option<PathBuf>,
    /// Start paused instead of running.
    pub paused: bool,
    /// Wall-clock time between ticks.
    pub tick_interval: Duration,
    /// Destination for a bare `export` command.
    pub summary_path: PathBuf,
}

/// A line typed at the live session prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Start,
    Pause,
    Reset,
    Increment(String),
    Decrement(String),
    SetCount(String, i64),
    SetRate(String, f64),
    Status,
    Export(Option<PathBuf>),
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();

        if let Some(role_id) = line.strip_prefix('+') {
            return Ok(Self::Increment(parse_role(role_id)?));
        }
        if let Some(role_id) = line.strip_prefix('-') {
            return Ok(Self::Decrement(parse_role(role_id)?));
        }

        let mut words = line.split_whitespace();
        let command = match (words.next(), words.next(), words.next()) {
            (None, _, _) | (Some("status"), None, _) => Self::Status,
            (Some("start"), None, _) => Self::Start,
            (Some("pause"), None, _) => Self::Pause,
            (Some("reset"), None, _) => Self::Reset,
            (Some("quit" | "exit" | "q"), None, _) => Self::Quit,
            (Some("export"), path, None) => Self::Export(path.map(PathBuf::from)),
            (Some("set"), Some(role_id), Some(count)) => Self::SetCount(
                role_id.to_string(),
                count
                    .parse()
                    .with_context(|| format!("invalid count: {count}"))?,
            ),
            (Some("rate"), Some(role_id), Some(rate)) => Self::SetRate(
                role_id.to_string(),
                rate.parse().with_context(|| format!("invalid rate: {rate}"))?,
            ),
            _ => bail!(
                "unknown command: {line} (try start, pause, reset, +ROLE, -ROLE, set ROLE N, rate ROLE R, status, export [PATH], quit)"
            ),
        };

        if words.next().is_some() {
            bail!("too many arguments: {line}");
        }
        Ok(command)
    }
}

fn parse_role(role_id: &str) -> Result<String> {
    let role_id = role_id.trim();
    if role_id.is_empty() || role_id.contains(char::is_whitespace) {
        bail!("expected a single role id after +/-");
    }
    Ok(role_id.to_string())
}

/// Whether the session loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Applies one command to the session and reports the result to `writer`.
pub fn apply_command<W: Write>(
    writer: &mut W,
    session: &mut SessionController,
    command: SessionCommand,
    default_export: &Path,
) -> Result<Outcome> {
    match command {
        SessionCommand::Start => {
            session.start();
            writeln!(writer, "{}", format_status(session))?;
        }
        SessionCommand::Pause => {
            session.pause();
            writeln!(writer, "{}", format_status(session))?;
        }
        SessionCommand::Reset => {
            session.reset();
            writeln!(writer, "{}", format_status(session))?;
        }
        SessionCommand::Increment(role_id) => {
            if known_role(writer, session, &role_id)? {
                let count = session.increment_role(&role_id);
                writeln!(writer, "{role_id}: {count}")?;
            }
        }
        SessionCommand::Decrement(role_id) => {
            if known_role(writer, session, &role_id)? {
                let count = session.decrement_role(&role_id);
                writeln!(writer, "{role_id}: {count}")?;
            }
        }
        SessionCommand::SetCount(role_id, count) => {
            if known_role(writer, session, &role_id)? {
                let count = session.set_role_count(&role_id, count);
                writeln!(writer, "{role_id}: {count}")?;
            }
        }
        SessionCommand::SetRate(role_id, rate) => {
            if known_role(writer, session, &role_id)? {
                let rate = session.set_role_rate(&role_id, rate);
                writeln!(writer, "{role_id}: {} / hr", format_currency(rate))?;
            }
        }
        SessionCommand::Status => {
            writeln!(writer, "{}", format_status(session))?;
            writeln!(
                writer,
                "Burn rate: {}",
                format_rate_breakdown(session.current_rate())
            )?;
        }
        SessionCommand::Export(path) => {
            let path = path.unwrap_or_else(|| default_export.to_path_buf());
            match write_summary(&path, &session.summary()) {
                Ok(()) => writeln!(writer, "Summary written to {}", path.display())?,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "export failed");
                    writeln!(writer, "export failed: {e:#}")?;
                }
            }
        }
        SessionCommand::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Continue)
}

fn known_role<W: Write>(writer: &mut W, session: &SessionController, role_id: &str) -> Result<bool> {
    if session.role(role_id).is_ok() {
        return Ok(true);
    }
    tracing::warn!(role_id, "ignoring command for unknown role");
    writeln!(writer, "unknown role: {role_id} (see `mct roles`)")?;
    Ok(false)
}

/// Runs a live session until `quit`, Ctrl+C, the tick limit, or end of input
/// (unless a tick limit is set and the clock is running).
pub fn run(session: SessionController, options: &RunOptions) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let session = runtime.block_on(run_session(session, options));
    // The stdin reader may still be parked on a blocking read
    runtime.shutdown_background();
    let session = session?;

    let summary = session.summary();
    println!(
        "Meeting ended: {} over {}",
        format_currency(summary.total_cost),
        format_elapsed(summary.total_seconds)
    );
    if let Some(path) = &options.output {
        write_summary(path, &summary)?;
        println!("Summary written to {}", path.display());
    }
    Ok(())
}

async fn run_session(mut session: SessionController, options: &RunOptions) -> Result<SessionController> {
    if !options.paused {
        session.start();
    }
    println!("{}", format_status(&session));

    let shared: SharedSession = Arc::new(Mutex::new(session));
    let mut driver = tokio::spawn(drive_ticks(Arc::clone(&shared), options.tick_interval, options.ticks));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            result = &mut driver => {
                let stats = result.context("tick driver stopped unexpectedly")??;
                tracing::debug!(?stats, "tick limit reached");
                break;
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("failed to read command")? else {
                    stdin_open = false;
                    // Nothing can resume a paused session once input is gone
                    if options.ticks.is_none() || !lock(&shared).is_running() {
                        break;
                    }
                    continue;
                };
                let command = match line.parse::<SessionCommand>() {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                let outcome = {
                    let mut guard = lock(&shared);
                    apply_command(&mut std::io::stdout().lock(), &mut guard, command, &options.summary_path)?
                };
                if outcome == Outcome::Quit {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    driver.abort();
    let session = lock(&shared).clone();
    Ok(session)
}

async fn drive_ticks(
    session: SharedSession,
    tick_interval: Duration,
    limit: Option<u64>,
) -> Result<DriveStats, CostError> {
    let mut ticker = IntervalTicks::new(tick_interval);
    let status_session = Arc::clone(&session);
    let mut applied = 0_u64;

    drive(&session, &mut ticker, move |_| {
        applied += 1;
        println!("{}", format_status(&lock(&status_session)));
        match limit {
            Some(limit) if applied >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    })
    .await
}
