//! `tkt submit` — create a ticket.

use crate::output::{OutputMode, fail, render};
use crate::project::Project;
use clap::Args;
use serde::Serialize;
use std::io::Write as _;
use tkt_core::model::ticket::Priority;
use tkt_core::store::tickets::{self, NewTicket};

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// One-line summary of the problem.
    #[arg(short, long)]
    pub title: String,

    /// Full problem description.
    #[arg(short, long)]
    pub description: String,

    /// Free-form category, e.g. "Software" or "Hardware".
    #[arg(short, long, default_value = "General")]
    pub category: String,

    /// Priority: critical, high, medium, or low.
    #[arg(short, long, default_value = "medium")]
    pub priority: Priority,

    /// Days from now until the deadline (1-90).
    #[arg(long, default_value = "30")]
    pub deadline_days: i64,
}

#[derive(Serialize)]
struct Submitted {
    id: i64,
    display_id: String,
}

pub fn run_submit(
    args: &SubmitArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &mut Project,
) -> anyhow::Result<()> {
    let actor = project.actor(user_flag)?;
    let created = tickets::create(
        &mut project.conn,
        &NewTicket {
            title: &args.title,
            description: &args.description,
            category: &args.category,
            priority: args.priority,
            submitted_by: actor.id,
            deadline_days: args.deadline_days,
        },
    )
    .map_err(|e| fail(output, &e))?;

    render(
        output,
        &Submitted {
            id: created.id,
            display_id: created.display_id,
        },
        |s, w| writeln!(w, "Submitted {} (#{})", s.display_id, s.id),
    )
}
