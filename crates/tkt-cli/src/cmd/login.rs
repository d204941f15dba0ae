//! `tkt login` — verify credentials.
//!
//! Stateless: there is no session to create, so this only confirms that
//! the email/password pair is valid. Commands identify the acting user
//! with `--user` / `TKT_USER`.

use crate::output::{CliError, OutputMode, render_error, render_success};
use crate::project::Project;
use clap::Args;
use tkt_core::auth;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email address of the account.
    #[arg(long)]
    pub email: String,

    /// Password to verify.
    #[arg(long)]
    pub password: String,
}

pub fn run_login(args: &LoginArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    match auth::authenticate(&project.conn, &args.email, &args.password)? {
        Some(user) => render_success(
            output,
            &format!("Welcome back, {} ({})", user.name, user.role),
        ),
        None => {
            render_error(
                output,
                &CliError::with_details(
                    "invalid email or password",
                    "Register first with `tkt register`.",
                    "E2004",
                ),
            )?;
            anyhow::bail!("invalid credentials");
        }
    }
}
