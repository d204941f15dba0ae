//! Canonical SQLite schema for the tracker.
//!
//! Normalized for queryability:
//! - `tickets` keeps the scalar ticket fields plus the denormalized
//!   `assigned_to` column ("who owns this now")
//! - `assignments` is the append-mostly claim ledger ("full history"),
//!   one row per (ticket, solver) pair
//! - `calendar_events` holds the automatic deadline event and any manually
//!   added meeting events for a ticket

/// Migration v1: core tables.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    credential_hash TEXT NOT NULL,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    display_id TEXT NOT NULL UNIQUE CHECK (display_id LIKE 'TKT-%'),
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    description TEXT NOT NULL CHECK (length(trim(description)) > 0),
    category TEXT NOT NULL,
    priority TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'submitted',
    submitted_by INTEGER NOT NULL REFERENCES users(id),
    created_at_us INTEGER NOT NULL,
    deadline_us INTEGER NOT NULL,
    assigned_to INTEGER REFERENCES users(id),
    resolution TEXT,
    resolved_at_us INTEGER
);

CREATE TABLE IF NOT EXISTS assignments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id INTEGER NOT NULL REFERENCES tickets(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    assigned_at_us INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'assigned',
    UNIQUE (ticket_id, user_id)
);

CREATE TABLE IF NOT EXISTS calendar_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id INTEGER NOT NULL REFERENCES tickets(id),
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    description TEXT,
    event_at_us INTEGER NOT NULL,
    created_by INTEGER NOT NULL REFERENCES users(id)
);
"#;

/// Migration v2: read-path indexes.
pub const MIGRATION_V2_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_tickets_created
    ON tickets(created_at_us DESC, id DESC);

CREATE INDEX IF NOT EXISTS idx_tickets_submitter_created
    ON tickets(submitted_by, created_at_us DESC, id DESC);

CREATE INDEX IF NOT EXISTS idx_tickets_status
    ON tickets(status);

CREATE INDEX IF NOT EXISTS idx_assignments_user
    ON assignments(user_id, ticket_id);

CREATE INDEX IF NOT EXISTS idx_assignments_ticket
    ON assignments(ticket_id);

CREATE INDEX IF NOT EXISTS idx_events_creator
    ON calendar_events(created_by, event_at_us);

CREATE INDEX IF NOT EXISTS idx_events_event_at
    ON calendar_events(event_at_us);
"#;

/// Indexes expected by the list/queue/calendar query paths.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_tickets_created",
    "idx_tickets_submitter_created",
    "idx_tickets_status",
    "idx_assignments_user",
    "idx_assignments_ticket",
    "idx_events_creator",
    "idx_events_event_at",
];
