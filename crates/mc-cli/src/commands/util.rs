//! Shared utilities for CLI commands.

use mc_core::{CostHistory, SessionController, default_roles};

/// Working seconds in a year: 40 hours × 52 weeks.
const WORKING_SECONDS_PER_YEAR: f64 = 40.0 * 52.0 * 3600.0;

/// Sparkline glyphs, lowest to highest.
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Builds a session from the configured and command-line attendees and
/// rates. Command-line values win.
pub fn build_session(
    config: &crate::Config,
    attendees: &[(String, i64)],
    rates: &[(String, f64)],
) -> SessionController {
    let mut session = SessionController::with_initial_counts(default_roles(), &config.role_counts())
        .with_overrides(&config.rate_overrides());

    for (role_id, count) in attendees {
        warn_if_unknown(&session, role_id);
        session.set_role_count(role_id, *count);
    }
    for (role_id, rate) in rates {
        warn_if_unknown(&session, role_id);
        session.set_role_rate(role_id, *rate);
    }

    session
}

fn warn_if_unknown(session: &SessionController, role_id: &str) {
    if session.role(role_id).is_err() {
        tracing::warn!(role_id, "role is not in the catalog and will not be charged");
    }
}

/// Formats seconds as `HH:MM:SS`. Negative or non-finite input reads as zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_elapsed(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Formats an amount as US dollars, e.g. `$1,234.57`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round();
    let cents = if cents.is_finite() { cents as u64 } else { 0 };
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Formats a burn rate per second, minute, hour and working year.
pub fn format_rate_breakdown(cost_per_second: f64) -> String {
    format!(
        "{} / sec ({} / min · {} / hr · {} / yr)",
        format_currency(cost_per_second),
        format_currency(cost_per_second * 60.0),
        format_currency(cost_per_second * 3600.0),
        format_currency(cost_per_second * WORKING_SECONDS_PER_YEAR),
    )
}

/// Renders the newest `width` samples as a one-line sparkline.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn sparkline(history: &CostHistory, width: usize) -> String {
    let top = (SPARK_LEVELS.len() - 1) as f64;
    let Some(points) = history.recent(width).trend(1.0, top) else {
        return "not enough data yet".to_string();
    };
    points
        .iter()
        .map(|&(_, y)| SPARK_LEVELS[(top - y).round().clamp(0.0, top) as usize])
        .collect()
}

/// One-line view of a session: state, clock, cost, rate and trend.
pub fn format_status(session: &SessionController) -> String {
    let state = if session.is_running() { "running" } else { "paused" };
    format!(
        "[{state}] {}  {}  {} / sec  {}",
        format_elapsed(session.total_seconds()),
        format_currency(session.total_cost()),
        format_currency(session.current_rate()),
        sparkline(session.history(), 24),
    )
}
