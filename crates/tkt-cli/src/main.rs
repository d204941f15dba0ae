#![forbid(unsafe_code)]

mod cmd;
mod output;
mod project;

use clap::{Parser, Subcommand};
use output::OutputMode;
use project::Project;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tkt: collaborative ticket tracker",
    long_about = None
)]
struct Cli {
    /// Explicit database path (skips .tkt directory discovery).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Act as this account (email); defaults to TKT_USER.
    #[arg(long, global = true, value_name = "EMAIL")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.json)
    }

    fn user_flag(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Workspace",
        about = "Initialize a tracker workspace",
        after_help = "EXAMPLES:\n    # Create .tkt/ in the current directory\n    tkt init"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Accounts",
        about = "Create an account",
        after_help = "EXAMPLES:\n    # Register a user\n    tkt register --email alice@example.com --name Alice --password s3cret\n\n    # Register an admin\n    tkt register --email ops@example.com --name Ops --password s3cret --admin"
    )]
    Register(cmd::register::RegisterArgs),

    #[command(
        next_help_heading = "Accounts",
        about = "Verify credentials",
        after_help = "EXAMPLES:\n    tkt login --email alice@example.com --password s3cret"
    )]
    Login(cmd::login::LoginArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Submit a new ticket",
        long_about = "Submit a ticket; a deadline calendar event is scheduled automatically.",
        after_help = "EXAMPLES:\n    tkt submit --user alice@example.com \\\n        --title \"Build fails on ARM\" --description \"Linker error\" \\\n        --priority high --deadline-days 10"
    )]
    Submit(cmd::submit::SubmitArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "List tickets, newest first",
        after_help = "EXAMPLES:\n    # Everything\n    tkt list\n\n    # Only your submissions\n    tkt list --mine --user alice@example.com"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Show one ticket",
        after_help = "EXAMPLES:\n    tkt show 3"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Solving",
        about = "Open tickets you could claim, highest priority first",
        after_help = "EXAMPLES:\n    tkt available --user bob@example.com"
    )]
    Available(cmd::available::AvailableArgs),

    #[command(
        next_help_heading = "Solving",
        about = "Claim a ticket",
        long_about = "Claim a ticket for yourself (or hand it to --to). The current \
                      assignee is overwritten; every past solver stays on record.",
        after_help = "EXAMPLES:\n    # Claim for yourself\n    tkt assign 3 --user bob@example.com\n\n    # Hand to someone else\n    tkt assign 3 --to carol@example.com"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Change a ticket's status (admin)",
        after_help = "EXAMPLES:\n    tkt status 3 in-progress --user ops@example.com\n    tkt status 3 solved --resolution \"restarted the daemon\" --user ops@example.com"
    )]
    Status(cmd::status::StatusArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Mark a ticket solved with a resolution (admin)",
        after_help = "EXAMPLES:\n    tkt resolve 3 \"swapped the cable\" --user ops@example.com"
    )]
    Resolve(cmd::status::ResolveArgs),

    #[command(
        next_help_heading = "Calendar",
        about = "Schedule an event on a ticket",
        after_help = "EXAMPLES:\n    tkt event 3 --title \"Meeting: triage\" --at 2026-09-01T10:00:00Z --user alice@example.com"
    )]
    Event(cmd::event::EventArgs),

    #[command(
        next_help_heading = "Calendar",
        about = "Show your calendar, grouped by day",
        long_about = "Show events you created plus events on tickets you solve. \
                      Admins see the system-wide calendar.",
        after_help = "EXAMPLES:\n    tkt calendar --user bob@example.com"
    )]
    Calendar(cmd::calendar::CalendarArgs),

    #[command(
        next_help_heading = "Reporting",
        about = "Ticket counts by status and priority (admin)",
        after_help = "EXAMPLES:\n    tkt stats --user ops@example.com"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Reporting",
        about = "Export all tickets as CSV (admin)",
        after_help = "EXAMPLES:\n    # To stdout\n    tkt export --user ops@example.com\n\n    # To a file\n    tkt export --output tickets.csv --user ops@example.com"
    )]
    Export(cmd::export::ExportArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TKT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "tkt=debug,info"
        } else {
            "tkt=info,warn"
        })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();
    let cwd = std::env::current_dir()?;

    // `init` is the only command that runs without an existing workspace.
    if let Commands::Init(ref args) = cli.command {
        return cmd::init::run_init(args, output, &cwd);
    }

    let mut project = Project::open(&cwd, cli.db.as_deref())?;

    match cli.command {
        Commands::Init(_) => unreachable!("handled above"),
        Commands::Register(ref args) => cmd::register::run_register(args, output, &project),
        Commands::Login(ref args) => cmd::login::run_login(args, output, &project),
        Commands::Submit(ref args) => {
            cmd::submit::run_submit(args, cli.user_flag(), output, &mut project)
        }
        Commands::List(ref args) => cmd::list::run_list(args, cli.user_flag(), output, &project),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project),
        Commands::Available(ref args) => {
            cmd::available::run_available(args, cli.user_flag(), output, &project)
        }
        Commands::Assign(ref args) => {
            cmd::assign::run_assign(args, cli.user_flag(), output, &mut project)
        }
        Commands::Status(ref args) => {
            cmd::status::run_status(args, cli.user_flag(), output, &mut project)
        }
        Commands::Resolve(ref args) => {
            cmd::status::run_resolve(args, cli.user_flag(), output, &mut project)
        }
        Commands::Event(ref args) => cmd::event::run_event(args, cli.user_flag(), output, &project),
        Commands::Calendar(ref args) => {
            cmd::calendar::run_calendar(args, cli.user_flag(), output, &project)
        }
        Commands::Stats(ref args) => cmd::stats::run_stats(args, cli.user_flag(), output, &project),
        Commands::Export(ref args) => {
            cmd::export::run_export(args, cli.user_flag(), output, &project)
        }
    }
}
