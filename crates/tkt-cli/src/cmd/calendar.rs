//! `tkt calendar` — upcoming events, grouped by day.
//!
//! Non-admins see events they created plus events on tickets they solve;
//! admins see everything. The engine returns a flat time-ordered list;
//! day grouping is purely presentation.

use crate::output::{OutputMode, fail, format_us, render};
use crate::project::Project;
use chrono::NaiveDate;
use clap::Args;
use std::io::{self, Write};
use tkt_core::model::user::Actor;
use tkt_core::store::calendar::{self, EventRow};

#[derive(Args, Debug)]
pub struct CalendarArgs {}

/// Group time-ordered events into (day, events) buckets, preserving order.
fn group_by_day(events: &[EventRow]) -> Vec<(NaiveDate, Vec<&EventRow>)> {
    let mut groups: Vec<(NaiveDate, Vec<&EventRow>)> = Vec::new();
    for event in events {
        let Some(day) = chrono::DateTime::from_timestamp_micros(event.event_at_us)
            .map(|dt| dt.date_naive())
        else {
            continue;
        };
        match groups.last_mut() {
            Some((current, bucket)) if *current == day => bucket.push(event),
            _ => groups.push((day, vec![event])),
        }
    }
    groups
}

fn write_calendar(events: &[EventRow], w: &mut dyn Write) -> io::Result<()> {
    if events.is_empty() {
        return writeln!(w, "No events.");
    }
    for (day, bucket) in group_by_day(events) {
        writeln!(w, "{}", day.format("%A, %Y-%m-%d"))?;
        for event in bucket {
            writeln!(
                w,
                "  {}  {}  [{}] by {}",
                format_us(event.event_at_us),
                event.title,
                event.ticket_title,
                event.creator_name,
            )?;
            if let Some(ref description) = event.description {
                writeln!(w, "          {description}")?;
            }
        }
    }
    Ok(())
}

pub fn run_calendar(
    _args: &CalendarArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project: &Project,
) -> anyhow::Result<()> {
    let actor = Actor::from(&project.actor(user_flag)?);
    let events = calendar::list_visible(&project.conn, actor).map_err(|e| fail(output, &e))?;
    render(output, &events, |events, w| write_calendar(events, w))
}
