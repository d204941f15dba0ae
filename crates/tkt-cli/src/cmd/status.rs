//! `tkt status` and `tkt resolve` — lifecycle transitions (admin only).

use crate::output::{OutputMode, fail, render_success};
use crate::project::Project;
use clap::Args;
use tkt_core::lifecycle;
use tkt_core::model::ticket::Status;
use tkt_core::model::user::Actor;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Numeric ticket id.
    pub ticket_id: i64,

    /// New status: submitted, in-progress, solved, or closed.
    pub status: Status,

    /// Resolution text; only stored when the new status is solved.
    #[arg(long)]
    pub resolution: Option<String>,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Numeric ticket id.
    pub ticket_id: i64,

    /// What fixed it.
    pub resolution: String,
}

pub fn run_status(
    args: &StatusArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &mut Project,
) -> anyhow::Result<()> {
    let actor = Actor::from(&project.actor(user_flag)?);
    let policy = project.config.lifecycle.transitions;
    lifecycle::update_status(
        &mut project.conn,
        actor,
        args.ticket_id,
        args.status,
        args.resolution.as_deref(),
        policy,
    )
    .map_err(|e| fail(output, &e))?;
    render_success(
        output,
        &format!("Ticket #{} is now {}", args.ticket_id, args.status),
    )
}

pub fn run_resolve(
    args: &ResolveArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &mut Project,
) -> anyhow::Result<()> {
    let actor = Actor::from(&project.actor(user_flag)?);
    let policy = project.config.lifecycle.transitions;
    lifecycle::resolve(&mut project.conn, actor, args.ticket_id, &args.resolution, policy)
        .map_err(|e| fail(output, &e))?;
    render_success(output, &format!("Ticket #{} solved", args.ticket_id))
}
