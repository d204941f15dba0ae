//! `tkt init` — create a tracker workspace.

use crate::output::{OutputMode, render_success};
use crate::project;
use clap::Args;

#[derive(Args, Debug)]
pub struct InitArgs {}

pub fn run_init(
    _args: &InitArgs,
    output: OutputMode,
    cwd: &std::path::Path,
) -> anyhow::Result<()> {
    let tracker_dir = project::init_workspace(cwd)?;
    render_success(
        output,
        &format!("Initialized tracker in {}", tracker_dir.display()),
    )?;
    Ok(())
}
