//! `tkt assign` — claim a ticket for yourself or hand it to another solver.

use crate::output::{OutputMode, fail, render_success};
use crate::project::Project;
use clap::Args;
use tkt_core::assign;
use tkt_core::auth;

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Numeric ticket id.
    pub ticket_id: i64,

    /// Email of the solver to assign; defaults to the acting user.
    #[arg(long)]
    pub to: Option<String>,
}

pub fn run_assign(
    args: &AssignArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &mut Project,
) -> anyhow::Result<()> {
    let solver = match args.to.as_deref() {
        Some(email) => auth::find_by_email(&project.conn, email)?
            .ok_or_else(|| anyhow::anyhow!("no account registered for '{email}'"))?,
        None => project.actor(user_flag)?,
    };

    let policy = project.config.assign.on_duplicate;
    let outcome = assign::assign(&mut project.conn, args.ticket_id, solver.id, policy)
        .map_err(|e| fail(output, &e))?;

    let note = if outcome.newly_recorded {
        format!("Assigned ticket #{} to {}", args.ticket_id, solver.name)
    } else {
        format!("Ticket #{} was already assigned to {}", args.ticket_id, solver.name)
    };
    render_success(output, &note)
}
