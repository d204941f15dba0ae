//! `tkt stats` — ticket counts by status and priority (admin only).

use crate::output::{CliError, OutputMode, fail, render, render_error};
use crate::project::Project;
use clap::Args;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};
use tkt_core::model::user::Role;
use tkt_core::store::tickets;

#[derive(Args, Debug)]
pub struct StatsArgs {}

#[derive(Serialize)]
struct StatsReport {
    by_status: HashMap<String, usize>,
    by_priority: HashMap<String, usize>,
}

fn write_counts(w: &mut dyn Write, heading: &str, counts: &HashMap<String, usize>) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    let mut entries: Vec<_> = counts.iter().collect();
    entries.sort();
    for (key, count) in entries {
        writeln!(w, "  {key:<12} {count}")?;
    }
    Ok(())
}

pub fn run_stats(
    _args: &StatsArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &Project,
) -> anyhow::Result<()> {
    let actor = project.actor(user_flag)?;
    if actor.role != Role::Admin {
        render_error(
            output,
            &CliError::with_details(
                "statistics require the admin role",
                "This operation requires an admin account.",
                "E2004",
            ),
        )?;
        anyhow::bail!("unauthorized");
    }

    let stats = tickets::stats(&project.conn).map_err(|e| fail(output, &e))?;
    render(
        output,
        &StatsReport {
            by_status: stats.by_status,
            by_priority: stats.by_priority,
        },
        |report, w| {
            write_counts(w, "By status:", &report.by_status)?;
            write_counts(w, "By priority:", &report.by_priority)
        },
    )
}
