//! The priority queue: a query-time view answering "what can this user
//! pick up next".
//!
//! A ticket is available to a user when it is still open (`submitted` or
//! `in progress`) and the user holds no ledger claim on it. Results are
//! ranked Critical > High > Medium > Low, with unknown priority values
//! last; within a rank the newest-first order of the underlying listing
//! is preserved (stable by construction: the rank is the leading sort
//! key, creation time and surrogate key break ties deterministically).

use crate::error::Result;
use crate::model::ticket::{Priority, Status, TicketRow, priority_rank};
use crate::store::tickets::{TICKET_SELECT, map_ticket_row};
use rusqlite::Connection;

/// The rank CASE expression, derived from [`priority_rank`] so the SQL
/// ordering cannot drift from the model's.
fn rank_case_sql() -> String {
    let mut case = String::from("CASE t.priority");
    for priority in [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ] {
        let name = priority.to_string();
        case.push_str(&format!(" WHEN '{name}' THEN {}", priority_rank(&name)));
    }
    case.push_str(&format!(" ELSE {} END", priority_rank("")));
    case
}

/// Comma-separated quoted list of the statuses [`Status::is_open`] accepts.
fn open_status_sql() -> String {
    [
        Status::Submitted,
        Status::InProgress,
        Status::Solved,
        Status::Closed,
    ]
    .into_iter()
    .filter(|status| status.is_open())
    .map(|status| format!("'{}'", status.as_str()))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Open tickets the user has not claimed, in priority order.
///
/// # Errors
///
/// Returns an error on storage failure.
pub fn list_available(conn: &Connection, user_id: i64) -> Result<Vec<TicketRow>> {
    let sql = format!(
        "{TICKET_SELECT}
         WHERE t.status IN ({statuses})
           AND t.id NOT IN (SELECT ticket_id FROM assignments WHERE user_id = ?1)
         ORDER BY {rank} ASC,
           t.created_at_us DESC, t.id DESC",
        statuses = open_status_sql(),
        rank = rank_case_sql(),
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([user_id], map_ticket_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
