//! The calendar scheduler.
//!
//! One automatic deadline event is derived per ticket at submission; any
//! user viewing a ticket may add further events (meetings, check-ins).
//! Events are never mutated or deleted. Visibility: an event is shown to
//! its creator and to every solver in the ticket's assignment ledger;
//! admins see the system-wide view.

use crate::error::{Result, TrackerError};
use crate::model::user::Actor;
use crate::store::tickets::{ticket_exists, user_exists};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde::Serialize;

/// A calendar event joined with its ticket title and creator name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub id: i64,
    pub ticket_id: i64,
    pub ticket_title: String,
    pub title: String,
    pub description: Option<String>,
    pub event_at_us: i64,
    pub created_by: i64,
    pub creator_name: String,
}

const EVENT_SELECT: &str = "
    SELECT e.id, e.ticket_id, t.title, e.title, e.description,
           e.event_at_us, e.created_by, u.name
    FROM calendar_events e
    JOIN tickets t ON t.id = e.ticket_id
    JOIN users u ON u.id = e.created_by
";

fn map_event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        ticket_id: row.get(1)?,
        ticket_title: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        event_at_us: row.get(5)?,
        created_by: row.get(6)?,
        creator_name: row.get(7)?,
    })
}

/// Insert the automatic deadline event for a freshly created ticket.
///
/// Runs on the same connection handle as the ticket insert so both land
/// in the caller's transaction.
pub(crate) fn insert_deadline_event(
    conn: &Connection,
    ticket_id: i64,
    ticket_title: &str,
    ticket_description: &str,
    deadline_us: i64,
    submitter_id: i64,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO calendar_events (ticket_id, title, description, event_at_us, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            ticket_id,
            format!("Deadline: {ticket_title}"),
            format!("Final deadline for solving: {ticket_description}"),
            deadline_us,
            submitter_id
        ],
    )?;
    Ok(())
}

/// Add a manually created event tied to a ticket.
///
/// Pure insert; no validation that the timestamp is in the future or
/// after the ticket's creation.
///
/// # Errors
///
/// `NotFound` for an unknown ticket or creator, `InvalidArgument` for a
/// blank title.
pub fn add_event(
    conn: &Connection,
    ticket_id: i64,
    title: &str,
    description: Option<&str>,
    event_at: DateTime<Utc>,
    created_by: i64,
) -> Result<i64> {
    if title.trim().is_empty() {
        return Err(TrackerError::InvalidArgument(
            "event title must not be empty".to_string(),
        ));
    }
    if !ticket_exists(conn, ticket_id)? {
        return Err(TrackerError::not_found("ticket", ticket_id));
    }
    if !user_exists(conn, created_by)? {
        return Err(TrackerError::not_found("user", created_by));
    }

    conn.execute(
        "INSERT INTO calendar_events (ticket_id, title, description, event_at_us, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            ticket_id,
            title,
            description,
            event_at.timestamp_micros(),
            created_by
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Events visible to `viewer`, ordered by event timestamp ascending.
///
/// Admins get the unfiltered system-wide view. Everyone else sees events
/// they created plus events on tickets they hold a ledger claim for.
/// Grouping by calendar day is the display layer's job.
///
/// # Errors
///
/// Returns an error on storage failure.
pub fn list_visible(conn: &Connection, viewer: Actor) -> Result<Vec<EventRow>> {
    if viewer.is_admin() {
        let sql = format!("{EVENT_SELECT} ORDER BY e.event_at_us, e.id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        return Ok(rows);
    }

    let sql = format!(
        "{EVENT_SELECT}
         WHERE e.created_by = ?1
            OR e.ticket_id IN (SELECT ticket_id FROM assignments WHERE user_id = ?1)
         ORDER BY e.event_at_us, e.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([viewer.id], map_event_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
