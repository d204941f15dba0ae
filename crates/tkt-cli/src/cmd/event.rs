//! `tkt event` — attach a calendar event to a ticket.

use crate::output::{OutputMode, fail, render_success};
use crate::project::Project;
use chrono::{DateTime, Utc};
use clap::Args;
use tkt_core::store::calendar;

#[derive(Args, Debug)]
pub struct EventArgs {
    /// Numeric ticket id the event belongs to.
    pub ticket_id: i64,

    /// Event title, e.g. "Meeting: triage".
    #[arg(short, long)]
    pub title: String,

    /// Optional details.
    #[arg(short, long)]
    pub description: Option<String>,

    /// When the event happens, RFC 3339 (e.g. 2026-09-01T10:00:00Z).
    #[arg(long)]
    pub at: DateTime<Utc>,
}

pub fn run_event(
    args: &EventArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &Project,
) -> anyhow::Result<()> {
    let actor = project.actor(user_flag)?;
    let event_id = calendar::add_event(
        &project.conn,
        args.ticket_id,
        &args.title,
        args.description.as_deref(),
        args.at,
        actor.id,
    )
    .map_err(|e| fail(output, &e))?;
    render_success(output, &format!("Scheduled event #{event_id}: {}", args.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_args_parse_rfc3339_timestamps() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: EventArgs,
        }
        let w = Wrapper::parse_from([
            "test",
            "5",
            "--title",
            "Meeting: triage",
            "--at",
            "2026-09-01T10:00:00Z",
        ]);
        assert_eq!(w.args.ticket_id, 5);
        assert_eq!(
            w.args.at,
            Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap()
        );
        assert!(w.args.description.is_none());
    }
}
