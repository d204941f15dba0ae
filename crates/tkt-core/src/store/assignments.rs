//! The assignment ledger: an append-mostly record of (ticket, solver)
//! claims. A ticket may accumulate many solvers here even though the
//! ticket row only shows the most recent one.

use crate::error::{Result, TrackerError};
use crate::store::tickets::{ticket_exists, user_exists};
use chrono::Utc;
use rusqlite::{Connection, params};
use serde::Serialize;

/// A ledger row joined with the solver's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    pub id: i64,
    pub ticket_id: i64,
    pub user_id: i64,
    pub solver_name: String,
    pub assigned_at_us: i64,
    pub status: String,
}

/// Record a (ticket, solver) claim if the exact pair is not already
/// present. Pure set-add: returns `true` when a new row was inserted,
/// `false` when the pair already existed. Never errors on duplicates.
///
/// # Errors
///
/// Returns `NotFound` for an unknown ticket or user.
pub fn record_assignment(conn: &Connection, ticket_id: i64, user_id: i64) -> Result<bool> {
    if !ticket_exists(conn, ticket_id)? {
        return Err(TrackerError::not_found("ticket", ticket_id));
    }
    if !user_exists(conn, user_id)? {
        return Err(TrackerError::not_found("user", user_id));
    }

    let inserted = conn.execute(
        "INSERT OR IGNORE INTO assignments (ticket_id, user_id, assigned_at_us)
         VALUES (?1, ?2, ?3)",
        params![ticket_id, user_id, Utc::now().timestamp_micros()],
    )?;
    Ok(inserted > 0)
}

/// Whether the ledger already holds the exact (ticket, solver) pair.
///
/// # Errors
///
/// Returns an error on storage failure.
pub fn pair_exists(conn: &Connection, ticket_id: i64, user_id: i64) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM assignments WHERE ticket_id = ?1 AND user_id = ?2
         )",
        params![ticket_id, user_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// All claims for one ticket, in insertion order.
///
/// # Errors
///
/// Returns an error on storage failure.
pub fn list_by_ticket(conn: &Connection, ticket_id: i64) -> Result<Vec<AssignmentRow>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.ticket_id, a.user_id, u.name, a.assigned_at_us, a.status
         FROM assignments a
         JOIN users u ON u.id = a.user_id
         WHERE a.ticket_id = ?1
         ORDER BY a.id",
    )?;
    let rows = stmt
        .query_map([ticket_id], |row| {
            Ok(AssignmentRow {
                id: row.get(0)?,
                ticket_id: row.get(1)?,
                user_id: row.get(2)?,
                solver_name: row.get(3)?,
                assigned_at_us: row.get(4)?,
                status: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
