//! The lifecycle controller: status transitions and resolution text.
//!
//! Which edges are legal is a policy choice ([`TransitionPolicy`]), not a
//! hardcoded rule, so a stricter machine can be swapped in without
//! touching callers. Only `solved` pairs with a resolution: supplying a
//! non-empty resolution alongside the `solved` status also stamps the
//! resolution time; any other update leaves the resolution fields alone.

use crate::error::{Result, TrackerError};
use crate::model::ticket::{Status, TransitionPolicy};
use crate::model::user::Actor;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::str::FromStr;

/// Apply a status transition, optionally recording a resolution.
///
/// # Errors
///
/// `Unauthorized` for non-admin actors, `NotFound` for an unknown ticket,
/// and `InvalidArgument` when the configured policy forbids the edge.
pub fn update_status(
    conn: &mut Connection,
    actor: Actor,
    ticket_id: i64,
    new_status: Status,
    resolution: Option<&str>,
    policy: TransitionPolicy,
) -> Result<()> {
    if !actor.is_admin() {
        return Err(TrackerError::Unauthorized(
            "changing ticket status requires the admin role".to_string(),
        ));
    }

    let tx = conn.transaction()?;

    let current_text: Option<String> = tx
        .query_row(
            "SELECT status FROM tickets WHERE id = ?1",
            [ticket_id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(current_text) = current_text else {
        return Err(TrackerError::not_found("ticket", ticket_id));
    };
    let current = Status::from_str(&current_text)
        .map_err(|e| TrackerError::InvalidArgument(e.to_string()))?;

    if !policy.allows(current, new_status) {
        return Err(TrackerError::InvalidArgument(format!(
            "transition '{current}' -> '{new_status}' is not allowed by the transition policy"
        )));
    }

    let resolution = resolution.map(str::trim).filter(|r| !r.is_empty());
    if new_status == Status::Solved && resolution.is_some() {
        tx.execute(
            "UPDATE tickets SET status = ?2, resolution = ?3, resolved_at_us = ?4
             WHERE id = ?1",
            params![
                ticket_id,
                new_status.as_str(),
                resolution,
                Utc::now().timestamp_micros()
            ],
        )?;
    } else {
        tx.execute(
            "UPDATE tickets SET status = ?2 WHERE id = ?1",
            params![ticket_id, new_status.as_str()],
        )?;
    }

    tx.commit()?;
    tracing::info!(ticket_id, status = %new_status, "updated ticket status");
    Ok(())
}

/// Mark a ticket solved with the given resolution text.
///
/// Sugar for [`update_status`] with [`Status::Solved`].
///
/// # Errors
///
/// Same failure modes as [`update_status`], plus `InvalidArgument` for a
/// blank resolution.
pub fn resolve(
    conn: &mut Connection,
    actor: Actor,
    ticket_id: i64,
    resolution: &str,
    policy: TransitionPolicy,
) -> Result<()> {
    if resolution.trim().is_empty() {
        return Err(TrackerError::InvalidArgument(
            "resolution must not be empty".to_string(),
        ));
    }
    update_status(
        conn,
        actor,
        ticket_id,
        Status::Solved,
        Some(resolution),
        policy,
    )
}
