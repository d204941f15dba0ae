//! `tkt register` — create an account.

use crate::output::{OutputMode, fail, render};
use crate::project::Project;
use clap::Args;
use serde::Serialize;
use std::io::Write as _;
use tkt_core::auth;
use tkt_core::model::user::Role;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Email address; must be unique.
    #[arg(long)]
    pub email: String,

    /// Display name shown on tickets and calendar events.
    #[arg(long)]
    pub name: String,

    /// Password; stored as a one-way digest.
    #[arg(long)]
    pub password: String,

    /// Grant the admin role instead of the default user role.
    #[arg(long)]
    pub admin: bool,
}

#[derive(Serialize)]
struct Registered {
    user_id: i64,
    email: String,
    role: Role,
}

pub fn run_register(args: &RegisterArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let role = if args.admin { Role::Admin } else { Role::User };
    let user_id = auth::register(&project.conn, &args.email, &args.password, &args.name, role)
        .map_err(|e| fail(output, &e))?;

    render(
        output,
        &Registered {
            user_id,
            email: args.email.clone(),
            role,
        },
        |r, w| writeln!(w, "Registered {} as user #{} ({})", r.email, r.user_id, r.role),
    )
}
