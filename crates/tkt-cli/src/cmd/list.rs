//! `tkt list` — list tickets.

use crate::output::{OutputMode, fail, format_us, render};
use crate::project::Project;
use clap::Args;
use std::io::{self, Write};
use tkt_core::model::ticket::TicketRow;
use tkt_core::store::tickets;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show only tickets you submitted.
    #[arg(long)]
    pub mine: bool,
}

/// Render tickets as the shared text table used by `list` and `available`.
pub(crate) fn write_ticket_table(rows: &[TicketRow], w: &mut dyn Write) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(w, "No tickets.");
    }
    writeln!(
        w,
        "{:<24} {:<9} {:<12} {:<16} {:<16} TITLE",
        "ID", "PRIORITY", "STATUS", "ASSIGNEE", "DEADLINE"
    )?;
    for row in rows {
        writeln!(
            w,
            "{:<24} {:<9} {:<12} {:<16} {:<16} {}",
            row.display_id,
            row.priority,
            row.status,
            row.assignee_name.as_deref().unwrap_or("-"),
            format_us(row.deadline_us),
            row.title,
        )?;
    }
    Ok(())
}

pub fn run_list(
    args: &ListArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &Project,
) -> anyhow::Result<()> {
    let rows = if args.mine {
        let actor = project.actor(user_flag)?;
        tickets::list_by_submitter(&project.conn, actor.id)
    } else {
        tickets::list_all(&project.conn)
    }
    .map_err(|e| fail(output, &e))?;

    render(output, &rows, |rows, w| write_ticket_table(rows, w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ListArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert!(!w.args.mine);
    }

    #[test]
    fn empty_table_prints_a_placeholder() {
        let mut buf = Vec::new();
        write_ticket_table(&[], &mut buf).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "No tickets.\n");
    }

    #[test]
    fn table_shows_display_id_and_dash_for_unassigned() {
        let row = TicketRow {
            id: 1,
            display_id: "TKT-20260823141503-ABCD".to_string(),
            title: "Printer on fire".to_string(),
            description: "again".to_string(),
            category: "Hardware".to_string(),
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
        write_ticket_table(&[row], &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("TKT-20260823141503-ABCD"));
        assert!(text.contains(" - "));
        assert!(text.contains("Printer on fire"));
    }
}
