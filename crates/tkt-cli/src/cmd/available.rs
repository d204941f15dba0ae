//! `tkt available` — tickets you could pick up, highest priority first.

use crate::cmd::list::write_ticket_table;
use crate::output::{OutputMode, fail, render};
use crate::project::Project;
use clap::Args;
use tkt_core::store::queue;

#[derive(Args, Debug)]
pub struct AvailableArgs {}

pub fn run_available(
    _args: &AvailableArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &Project,
) -> anyhow::Result<()> {
    let actor = project.actor(user_flag)?;
    let rows = queue::list_available(&project.conn, actor.id).map_err(|e| fail(output, &e))?;
    render(output, &rows, |rows, w| write_ticket_table(rows, w))
}
