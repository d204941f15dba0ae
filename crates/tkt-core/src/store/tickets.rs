//! The ticket store: creation and the two read projections.
//!
//! `create` is a compound write — the ticket row and its automatic
//! deadline calendar event land in one transaction, so a crash between the
//! two can never leave a ticket without its deadline event.

use crate::error::{Result, TrackerError, conflict_on_unique};
use crate::model::display_id;
use crate::model::ticket::{Priority, TicketRow};
use crate::store::calendar;
use chrono::{Duration, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;

/// Deadline offsets accepted at submission, in days from now.
pub const DEADLINE_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=90;

/// Caller-supplied fields for a new ticket.
#[derive(Debug, Clone)]
pub struct NewTicket<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Open string, not an enum — any category is accepted.
    pub category: &'a str,
    pub priority: Priority,
    pub submitted_by: i64,
    /// Days from now until the deadline; must fall in [`DEADLINE_DAYS_RANGE`].
    pub deadline_days: i64,
}

/// Keys of a freshly created ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTicket {
    pub id: i64,
    pub display_id: String,
}

/// Aggregate counters backing the admin statistics view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketStats {
    pub by_status: HashMap<String, usize>,
    pub by_priority: HashMap<String, usize>,
}

pub(crate) const TICKET_SELECT: &str = "
    SELECT t.id, t.display_id, t.title, t.description, t.category,
           t.priority, t.status, t.submitted_by, s.name,
           t.assigned_to, a.name,
           t.created_at_us, t.deadline_us, t.resolution, t.resolved_at_us
    FROM tickets t
    JOIN users s ON s.id = t.submitted_by
    LEFT JOIN users a ON a.id = t.assigned_to
";

pub(crate) fn map_ticket_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TicketRow> {
    Ok(TicketRow {
        id: row.get(0)?,
        display_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        priority: row.get(5)?,
        status: row.get(6)?,
        submitted_by: row.get(7)?,
        submitter_name: row.get(8)?,
        assigned_to: row.get(9)?,
        assignee_name: row.get(10)?,
        created_at_us: row.get(11)?,
        deadline_us: row.get(12)?,
        resolution: row.get(13)?,
        resolved_at_us: row.get(14)?,
    })
}

pub(crate) fn ticket_exists(conn: &Connection, ticket_id: i64) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM tickets WHERE id = ?1)",
        [ticket_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub(crate) fn user_exists(conn: &Connection, user_id: i64) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Create a ticket with status `submitted` and schedule its deadline event.
///
/// The deadline is computed once, at creation, from the caller-chosen
/// offset; it is never recomputed afterwards.
///
/// # Errors
///
/// `InvalidArgument` for blank title/description or an out-of-range
/// deadline offset, `NotFound` for an unknown submitter, and `Conflict`
/// when the generated display identifier already exists (no retry).
pub fn create(conn: &mut Connection, new: &NewTicket<'_>) -> Result<CreatedTicket> {
    if new.title.trim().is_empty() {
        return Err(TrackerError::InvalidArgument(
            "title must not be empty".to_string(),
        ));
    }
    if new.description.trim().is_empty() {
        return Err(TrackerError::InvalidArgument(
            "description must not be empty".to_string(),
        ));
    }
    if !DEADLINE_DAYS_RANGE.contains(&new.deadline_days) {
        return Err(TrackerError::InvalidArgument(format!(
            "deadline must be 1-90 days from now, got {}",
            new.deadline_days
        )));
    }

    let now = Utc::now();
    let created_at_us = now.timestamp_micros();
    let deadline_us = (now + Duration::days(new.deadline_days)).timestamp_micros();
    let display_id = display_id::generate(now);

    let tx = conn.transaction()?;

    if !user_exists(&tx, new.submitted_by)? {
        return Err(TrackerError::not_found("user", new.submitted_by));
    }

    tx.execute(
        "INSERT INTO tickets (
            display_id, title, description, category, priority,
            status, submitted_by, created_at_us, deadline_us
         ) VALUES (?1, ?2, ?3, ?4, ?5, 'submitted', ?6, ?7, ?8)",
        params![
            display_id,
            new.title,
            new.description,
            new.category,
            new.priority.to_string(),
            new.submitted_by,
            created_at_us,
            deadline_us
        ],
    )
    .map_err(|e| conflict_on_unique(e, "display identifier collision"))?;

    let ticket_id = tx.last_insert_rowid();

    calendar::insert_deadline_event(
        &tx,
        ticket_id,
        new.title,
        new.description,
        deadline_us,
        new.submitted_by,
    )?;

    tx.commit()?;
    tracing::info!(ticket_id, %display_id, "created ticket");

    Ok(CreatedTicket {
        id: ticket_id,
        display_id,
    })
}

/// All tickets, newest first; creation-time ties break by surrogate key
/// descending (insertion order preserved).
///
/// # Errors
///
/// Returns an error on storage failure.
pub fn list_all(conn: &Connection) -> Result<Vec<TicketRow>> {
    let sql = format!("{TICKET_SELECT} ORDER BY t.created_at_us DESC, t.id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], map_ticket_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Same projection as [`list_all`], filtered to one submitter.
///
/// # Errors
///
/// Returns an error on storage failure.
pub fn list_by_submitter(conn: &Connection, user_id: i64) -> Result<Vec<TicketRow>> {
    let sql = format!(
        "{TICKET_SELECT} WHERE t.submitted_by = ?1
         ORDER BY t.created_at_us DESC, t.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([user_id], map_ticket_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Fetch a single ticket by surrogate key.
///
/// # Errors
///
/// Returns `NotFound` when no such ticket exists.
pub fn get(conn: &Connection, ticket_id: i64) -> Result<TicketRow> {
    let sql = format!("{TICKET_SELECT} WHERE t.id = ?1");
    conn.query_row(&sql, [ticket_id], map_ticket_row)
        .optional()?
        .ok_or_else(|| TrackerError::not_found("ticket", ticket_id))
}

/// Overwrite the denormalized current-assignee field (last writer wins).
///
/// # Errors
///
/// Returns `NotFound` for an unknown ticket or user.
pub fn set_assignee(conn: &Connection, ticket_id: i64, user_id: i64) -> Result<()> {
    if !user_exists(conn, user_id)? {
        return Err(TrackerError::not_found("user", user_id));
    }
    let changed = conn.execute(
        "UPDATE tickets SET assigned_to = ?2 WHERE id = ?1",
        params![ticket_id, user_id],
    )?;
    if changed == 0 {
        return Err(TrackerError::not_found("ticket", ticket_id));
    }
    Ok(())
}

/// Ticket counts grouped by status and by priority.
///
/// # Errors
///
/// Returns an error on storage failure.
pub fn stats(conn: &Connection) -> Result<TicketStats> {
    Ok(TicketStats {
        by_status: count_grouped(conn, "status")?,
        by_priority: count_grouped(conn, "priority")?,
    })
}

fn count_grouped(conn: &Connection, column: &str) -> Result<HashMap<String, usize>> {
    // `column` is one of two compile-time constants, never caller input.
    let sql = format!("SELECT {column}, COUNT(*) FROM tickets GROUP BY {column}");
    let mut stmt = conn.prepare(&sql)?;
    let mut out = HashMap::new();
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (key, count) = row?;
        out.insert(key, usize::try_from(count).unwrap_or(0));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{NewTicket, create, get, list_all, list_by_submitter, set_assignee, stats};
    use crate::error::TrackerError;
    use crate::model::display_id;
    use crate::model::ticket::Priority;
    use crate::model::user::Role;
    use crate::store::testutil;
    use rusqlite::params;

    #[test]
    fn create_returns_well_formed_display_id_and_submitted_status() {
        let mut conn = testutil::conn();
        let alice = testutil::seed_user(&conn, "alice@example.com", "Alice", Role::User);

        let created = create(
            &mut conn,
            &NewTicket {
                title: "Build fails on ARM",
                description: "Linker error in release mode",
                category: "Software",
                priority: Priority::High,
                submitted_by: alice,
                deadline_days: 10,
            },
        )
        .expect("create ticket");

        assert!(display_id::is_well_formed(&created.display_id));

        let row = get(&conn, created.id).expect("get ticket");
        assert_eq!(row.status, "submitted");
        assert_eq!(row.priority, "High");
        assert_eq!(row.submitter_name, "Alice");
        assert!(row.assigned_to.is_none());
        assert!(row.resolution.is_none());
        assert!(row.resolved_at_us.is_none());
    }

    #[test]
    fn create_schedules_the_deadline_event_in_the_same_transaction() {
        let mut conn = testutil::conn();
        let alice = testutil::seed_user(&conn, "alice@example.com", "Alice", Role::User);

        let created = create(
            &mut conn,
            &NewTicket {
                title: "T1",
                description: "needs a deadline",
                category: "Research",
                priority: Priority::High,
                submitted_by: alice,
                deadline_days: 10,
            },
        )
        .expect("create ticket");

        let ticket = get(&conn, created.id).expect("get ticket");
        let (title, event_at_us, created_by): (String, i64, i64) = conn
            .query_row(
                "SELECT title, event_at_us, created_by
                 FROM calendar_events WHERE ticket_id = ?1",
                [created.id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .expect("deadline event row");

        assert_eq!(title, "Deadline: T1");
        assert_eq!(event_at_us, ticket.deadline_us);
        assert_eq!(created_by, alice);

        let ten_days_us = 10 * 24 * 3600 * 1_000_000_i64;
        assert_eq!(ticket.deadline_us - ticket.created_at_us, ten_days_us);
    }

    #[test]
    fn create_rejects_blank_fields_and_bad_deadlines() {
        let mut conn = testutil::conn();
        let alice = testutil::seed_user(&conn, "alice@example.com", "Alice", Role::User);

        let base = NewTicket {
            title: "ok",
            description: "ok",
            category: "Other",
            priority: Priority::Low,
            submitted_by: alice,
            deadline_days: 30,
        };

        for bad in [
            NewTicket { title: "  ", ..base.clone() },
            NewTicket { description: "", ..base.clone() },
            NewTicket { deadline_days: 0, ..base.clone() },
            NewTicket { deadline_days: 91, ..base.clone() },
        ] {
            let err = create(&mut conn, &bad).expect_err("must be rejected");
            assert!(matches!(err, TrackerError::InvalidArgument(_)), "{err}");
        }
    }

    #[test]
    fn create_with_unknown_submitter_is_not_found() {
        let mut conn = testutil::conn();
        let err = create(
            &mut conn,
            &NewTicket {
                title: "orphan",
                description: "no such user",
                category: "Other",
                priority: Priority::Low,
                submitted_by: 404,
                deadline_days: 5,
            },
        )
        .expect_err("unknown submitter");
        assert!(matches!(err, TrackerError::NotFound { entity: "user", .. }));

        // Rollback: no partial ticket and no orphaned event.
        let tickets: i64 = conn
            .query_row("SELECT COUNT(*) FROM tickets", [], |r| r.get(0))
            .expect("count");
        let events: i64 = conn
            .query_row("SELECT COUNT(*) FROM calendar_events", [], |r| r.get(0))
            .expect("count");
        assert_eq!((tickets, events), (0, 0));
    }

    #[test]
    fn list_all_is_newest_first_with_id_tiebreak() {
        let mut conn = testutil::conn();
        let alice = testutil::seed_user(&conn, "alice@example.com", "Alice", Role::User);
        let first = testutil::seed_ticket(&mut conn, "first", Priority::Low, alice);
        let second = testutil::seed_ticket(&mut conn, "second", Priority::Low, alice);

        // Force identical creation instants so only the id tiebreak decides.
        conn.execute("UPDATE tickets SET created_at_us = 1000", [])
            .expect("flatten timestamps");

        let rows = list_all(&conn).expect("list");
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn list_by_submitter_filters_and_keeps_order() {
        let mut conn = testutil::conn();
        let alice = testutil::seed_user(&conn, "alice@example.com", "Alice", Role::User);
        let bob = testutil::seed_user(&conn, "bob@example.com", "Bob", Role::User);

        let a1 = testutil::seed_ticket(&mut conn, "alice-1", Priority::Low, alice);
        let _b1 = testutil::seed_ticket(&mut conn, "bob-1", Priority::Low, bob);
        let a2 = testutil::seed_ticket(&mut conn, "alice-2", Priority::Low, alice);
        conn.execute(
            "UPDATE tickets SET created_at_us = id",
            [],
        )
        .expect("monotonic timestamps");

        let rows = list_by_submitter(&conn, alice).expect("list");
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a2, a1]);
        assert!(rows.iter().all(|r| r.submitted_by == alice));
    }

    #[test]
    fn set_assignee_overwrites_prior_value() {
        let mut conn = testutil::conn();
        let alice = testutil::seed_user(&conn, "alice@example.com", "Alice", Role::User);
        let bob = testutil::seed_user(&conn, "bob@example.com", "Bob", Role::User);
        let ticket = testutil::seed_ticket(&mut conn, "claimable", Priority::Medium, alice);

        set_assignee(&conn, ticket, alice).expect("first assignee");
        set_assignee(&conn, ticket, bob).expect("second assignee");

        let row = get(&conn, ticket).expect("get");
        assert_eq!(row.assigned_to, Some(bob));
        assert_eq!(row.assignee_name.as_deref(), Some("Bob"));
    }

    #[test]
    fn set_assignee_on_missing_rows_is_not_found() {
        let mut conn = testutil::conn();
        let alice = testutil::seed_user(&conn, "alice@example.com", "Alice", Role::User);
        let ticket = testutil::seed_ticket(&mut conn, "t", Priority::Low, alice);

        assert!(matches!(
            set_assignee(&conn, 404, alice),
            Err(TrackerError::NotFound { entity: "ticket", .. })
        ));
        assert!(matches!(
            set_assignee(&conn, ticket, 404),
            Err(TrackerError::NotFound { entity: "user", .. })
        ));
    }

    #[test]
    fn stats_counts_by_status_and_priority() {
        let mut conn = testutil::conn();
        let alice = testutil::seed_user(&conn, "alice@example.com", "Alice", Role::User);
        testutil::seed_ticket(&mut conn, "a", Priority::Critical, alice);
        testutil::seed_ticket(&mut conn, "b", Priority::Critical, alice);
        let closed = testutil::seed_ticket(&mut conn, "c", Priority::Low, alice);
        conn.execute(
            "UPDATE tickets SET status = 'closed' WHERE id = ?1",
            params![closed],
        )
        .expect("close one");

        let stats = stats(&conn).expect("stats");
        assert_eq!(stats.by_status.get("submitted"), Some(&2));
        assert_eq!(stats.by_status.get("closed"), Some(&1));
        assert_eq!(stats.by_priority.get("Critical"), Some(&2));
        assert_eq!(stats.by_priority.get("Low"), Some(&1));
    }
}
