//! `tkt export` — dump all tickets as CSV (admin only).
//!
//! Hand-rolled RFC 4180 quoting: fields containing a comma, a double
//! quote, or a newline are wrapped in quotes with inner quotes doubled.

use crate::output::{CliError, OutputMode, format_us, render_error};
use crate::project::Project;
use anyhow::{Context as _, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tkt_core::model::ticket::TicketRow;
use tkt_core::model::user::Role;
use tkt_core::store::tickets;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output CSV path (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

const HEADER: &str =
    "display_id,title,category,priority,status,submitter,assignee,created,deadline,resolution";

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_row(w: &mut dyn Write, row: &TicketRow) -> io::Result<()> {
    let fields = [
        csv_field(&row.display_id),
        csv_field(&row.title),
        csv_field(&row.category),
        csv_field(&row.priority),
        csv_field(&row.status),
        csv_field(&row.submitter_name),
        csv_field(row.assignee_name.as_deref().unwrap_or("")),
        format_us(row.created_at_us),
        format_us(row.deadline_us),
        csv_field(row.resolution.as_deref().unwrap_or("")),
    ];
    writeln!(w, "{}", fields.join(","))
}

pub fn run_export(
    args: &ExportArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &Project,
) -> Result<()> {
    let actor = project.actor(user_flag)?;
    if actor.role != Role::Admin {
        render_error(
            output,
            &CliError::with_details(
                "export requires the admin role",
                "This operation requires an admin account.",
                "E2004",
            ),
        )?;
        anyhow::bail!("unauthorized");
    }

    let rows = tickets::list_all(&project.conn)?;

    let mut out: Box<dyn Write> = match args.output.as_ref() {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    writeln!(out, "{HEADER}")?;
    for row in &rows {
        write_row(&mut out, row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{HEADER, csv_field, write_row};
    use tkt_core::model::ticket::TicketRow;

    #[test]
    fn plain_fields_pass_through_unquoted() {
        assert_eq!(csv_field("Printer on fire"), "Printer on fire");
        assert_eq!(csv_field(""), "");
    }

    #[test]
    fn commas_quotes_and_newlines_force_quoting() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn rows_match_the_header_column_count() {
        let row = TicketRow {
            id: 1,
            display_id: "TKT-20260823141503-ABCD".to_string(),
            title: "needs, quoting".to_string(),
            description: "unused in export".to_string(),
            category: "Software".to_string(),
            priority: "High".to_string(),
            status: "submitted".to_string(),
            submitted_by: 1,
            submitter_name: "Alice".to_string(),
            assigned_to: None,
            assignee_name: None,
            created_at_us: 0,
            deadline_us: 0,
            resolution: None,
            resolved_at_us: None,
        };
        let mut buf = Vec::new();
        write_row(&mut buf, &row).expect("write");
        let line = String::from_utf8(buf).expect("utf8");

        // Commas inside the quoted title must not add columns.
        let columns = |s: &str| {
            let mut count = 1;
            let mut in_quotes = false;
            for c in s.trim_end().chars() {
                match c {
                    '"' => in_quotes = !in_quotes,
                    ',' if !in_quotes => count += 1,
                    _ => {}
                }
            }
            count
        };
        assert_eq!(columns(&line), HEADER.split(',').count());
        assert!(line.contains("\"needs, quoting\""));
    }
}
