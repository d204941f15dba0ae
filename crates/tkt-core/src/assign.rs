//! The assignment manager: claiming a ticket updates the denormalized
//! current-assignee field and appends to the ledger as one transaction,
//! so the two can never disagree after a crash or a failed step.
//!
//! Ticket status does not gate claiming; a closed ticket still accepts
//! solvers. A test pins that behavior.

use crate::error::{Result, TrackerError};
use crate::store::{assignments, tickets};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// What happens when the exact (ticket, user) pair is claimed twice.
///
/// Configured via `assign.on-duplicate`; `Reject` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// A second identical claim is a user-facing `Conflict`.
    #[default]
    Reject,
    /// A second identical claim succeeds silently; the ledger is unchanged.
    Accept,
}

/// Result of a successful claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignOutcome {
    /// `true` when a new ledger row was appended, `false` when the pair
    /// already existed (only reachable under [`DuplicatePolicy::Accept`]).
    pub newly_recorded: bool,
}

/// Claim a ticket for a solver.
///
/// Overwrites the ticket's current assignee (last writer wins) and
/// set-adds the (ticket, solver) pair to the ledger, atomically.
///
/// # Errors
///
/// `NotFound` for an unknown ticket or user; `Conflict` when the pair
/// already exists and the policy is [`DuplicatePolicy::Reject`]. On any
/// error neither store is modified.
pub fn assign(
    conn: &mut Connection,
    ticket_id: i64,
    user_id: i64,
    policy: DuplicatePolicy,
) -> Result<AssignOutcome> {
    let tx = conn.transaction()?;

    if !tickets::ticket_exists(&tx, ticket_id)? {
        return Err(TrackerError::not_found("ticket", ticket_id));
    }
    if !tickets::user_exists(&tx, user_id)? {
        return Err(TrackerError::not_found("user", user_id));
    }

    let duplicate = assignments::pair_exists(&tx, ticket_id, user_id)?;
    if duplicate && policy == DuplicatePolicy::Reject {
        return Err(TrackerError::Conflict(format!(
            "ticket {ticket_id} is already assigned to user {user_id}"
        )));
    }

    tickets::set_assignee(&tx, ticket_id, user_id)?;
    let newly_recorded = assignments::record_assignment(&tx, ticket_id, user_id)?;

    tx.commit()?;
    tracing::info!(ticket_id, user_id, newly_recorded, "assigned ticket");

    Ok(AssignOutcome { newly_recorded })
}
