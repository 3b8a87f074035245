//! Estimate command for projecting a meeting's cost up front.
//!
//! Runs the same accounting as a live session, as a single tick spanning the
//! whole meeting from an empty snapshot.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};

use mc_core::{MeetingCostSnapshot, MeetingSummary, SessionController, build_summary};

use super::util::{format_currency, format_elapsed, format_rate_breakdown};

/// Runs the estimate command for `seconds` of meeting time.
pub fn run<W: Write>(
    writer: &mut W,
    session: &SessionController,
    seconds: f64,
    json: bool,
) -> Result<()> {
    let summary = estimate(session, seconds)?;

    if json {
        let json = summary.to_json_pretty().context("failed to serialize summary")?;
        writeln!(writer, "{json}")?;
    } else {
        write!(writer, "{}", format_estimate(&summary))?;
    }
    Ok(())
}

/// Summary of a meeting of `seconds` with the session's attendees and rates.
pub fn estimate(session: &SessionController, seconds: f64) -> Result<MeetingSummary> {
    let roles = session.effective_roles();
    let snapshot = MeetingCostSnapshot::empty()
        .advance(seconds, session.role_counts(), &roles)
        .context("invalid meeting length")?;

    Ok(build_summary(&snapshot, session.role_counts(), &roles, None))
}

/// Formats the human-readable estimate.
pub fn format_estimate(summary: &MeetingSummary) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "MEETING ESTIMATE: {}",
        format_elapsed(summary.total_seconds)
    )
    .unwrap();

    writeln!(output).unwrap();
    writeln!(output, "ATTENDEES").unwrap();
    writeln!(output, "─────────").unwrap();

    let present: Vec<_> = summary.attendees.iter().filter(|a| a.count > 0).collect();
    if present.is_empty() {
        writeln!(output, "  (no attendees)").unwrap();
    }
    for attendee in present {
        let share = format_currency(attendee.estimated_cost_share);
        writeln!(
            output,
            "  {:<26}{:>3}{share:>14}",
            attendee.role_label, attendee.count
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Total cost:  {}", format_currency(summary.total_cost)).unwrap();
    writeln!(
        output,
        "Burn rate:   {}",
        format_rate_breakdown(summary.cost_per_second)
    )
    .unwrap();

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use mc_core::default_roles;

    fn session() -> SessionController {
        let mut session = SessionController::new(default_roles());
        session.set_role_count("senior_leader", 1);
        session.set_role_count("individual_contributor", 3);
        session
    }

    #[test]
    fn estimate_reports_shares_and_rate() {
        let summary = estimate(&session(), 1800.0).unwrap();

        assert_snapshot!(format_estimate(&summary), @r"
        MEETING ESTIMATE: 00:30:00

        ATTENDEES
        ─────────
          Senior Leader               1       $120.00
          Individual Contributor      3       $180.00

        SUMMARY
        ───────
        Total cost:  $300.00
        Burn rate:   $0.17 / sec ($10.00 / min · $600.00 / hr · $1,248,000.00 / yr)
        ");
    }

    #[test]
    fn estimate_with_empty_room_costs_nothing() {
        let summary = estimate(&SessionController::default(), 600.0).unwrap();

        assert_eq!(summary.total_seconds, 600.0);
        assert_eq!(summary.total_cost, 0.0);
        assert!(format_estimate(&summary).contains("(no attendees)"));
    }

    #[test]
    fn estimate_rejects_negative_length() {
        let err = estimate(&session(), -60.0).unwrap_err();
        assert!(err.to_string().contains("invalid meeting length"));
    }

    #[test]
    fn estimate_json_is_a_summary_document() {
        let mut output = Vec::new();

        run(&mut output, &session(), 120.0, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["totalSeconds"], 120.0);
        assert_eq!(value["attendees"].as_array().unwrap().len(), 3);
        assert!(value.get("history").is_none());
        assert!(value["generatedAt"].as_str().unwrap().ends_with('Z'));
    }
}
