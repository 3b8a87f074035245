//! Roles command for listing the attendee catalog.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};

use mc_core::{MeetingRole, RateOverrides, apply_rate_overrides};

use super::util::format_currency;

/// Runs the roles command.
pub fn run<W: Write>(
    writer: &mut W,
    catalog: &[MeetingRole],
    overrides: &RateOverrides,
    json: bool,
) -> Result<()> {
    if json {
        let roles = apply_rate_overrides(catalog, overrides);
        let json = serde_json::to_string_pretty(&roles).context("failed to serialize roles")?;
        writeln!(writer, "{json}")?;
    } else {
        write!(writer, "{}", format_roles(catalog, overrides))?;
    }
    Ok(())
}

/// Formats the catalog as a table, marking overridden rates.
pub fn format_roles(catalog: &[MeetingRole], overrides: &RateOverrides) -> String {
    let mut output = String::new();

    writeln!(output, "ROLES").unwrap();
    writeln!(output, "─────").unwrap();

    for role in apply_rate_overrides(catalog, overrides) {
        let rate = format!("{} / hr", format_currency(role.hourly_rate));
        let marker = if overrides.get(&role.id).is_some() {
            "  (override)"
        } else {
            ""
        };
        writeln!(output, "{:<24}{:<24}{rate:>14}{marker}", role.id, role.label).unwrap();
    }

    output
}
