//! `tkt show` — full details for one ticket.

use crate::output::{OutputMode, fail, format_us, render};
use crate::project::Project;
use clap::Args;
use std::io::Write as _;
use tkt_core::store::tickets;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Numeric ticket id (the `#N` from `tkt submit`).
    pub ticket_id: i64,
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let row = tickets::get(&project.conn, args.ticket_id).map_err(|e| fail(output, &e))?;

    render(output, &row, |row, w| {
        writeln!(w, "{}  {}", row.display_id, row.title)?;
        writeln!(w, "  category:   {}", row.category)?;
        writeln!(w, "  priority:   {}", row.priority)?;
        writeln!(w, "  status:     {}", row.status)?;
        writeln!(w, "  submitter:  {}", row.submitter_name)?;
        writeln!(
            w,
            "  assignee:   {}",
            row.assignee_name.as_deref().unwrap_or("-")
        )?;
        writeln!(w, "  created:    {}", format_us(row.created_at_us))?;
        writeln!(w, "  deadline:   {}", format_us(row.deadline_us))?;
        if let Some(ref resolution) = row.resolution {
            writeln!(w, "  resolution: {resolution}")?;
            if let Some(at) = row.resolved_at_us {
                writeln!(w, "  resolved:   {}", format_us(at))?;
            }
        }
        writeln!(w)?;
        writeln!(w, "{}", row.description)
    })
}
