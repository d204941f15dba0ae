//! Registration and credential verification.
//!
//! Credentials are stored as a SHA-256 hex digest and compared one-way;
//! the raw password never touches the database. Session bookkeeping is the
//! calling layer's problem — this module only answers "who is this".

use crate::error::{Result, TrackerError, conflict_on_unique};
use crate::model::user::{Role, User};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::str::FromStr;

/// One-way hash used for credential storage and comparison.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Register a new account.
///
/// # Errors
///
/// Returns `InvalidArgument` when any field is blank and `Conflict` when
/// the email is already taken; the existing record is left untouched.
pub fn register(
    conn: &Connection,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
) -> Result<i64> {
    for (field, value) in [("email", email), ("password", password), ("name", name)] {
        if value.trim().is_empty() {
            return Err(TrackerError::InvalidArgument(format!(
                "{field} must not be empty"
            )));
        }
    }

    conn.execute(
        "INSERT INTO users (email, credential_hash, name, role, created_at_us)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            email,
            hash_password(password),
            name,
            role.as_str(),
            Utc::now().timestamp_micros()
        ],
    )
    .map_err(|e| conflict_on_unique(e, "email already exists"))?;

    let user_id = conn.last_insert_rowid();
    tracing::info!(user_id, role = %role, "registered user");
    Ok(user_id)
}

/// Verify credentials, returning the account when they match.
///
/// # Errors
///
/// Returns an error only on storage failure; a wrong email or password is
/// reported as `Ok(None)`.
pub fn authenticate(conn: &Connection, email: &str, password: &str) -> Result<Option<User>> {
    let Some(user) = find_by_email(conn, email)? else {
        return Ok(None);
    };

    let stored: String = conn.query_row(
        "SELECT credential_hash FROM users WHERE id = ?1",
        [user.id],
        |row| row.get(0),
    )?;

    if stored == hash_password(password) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Look up an account by email.
///
/// # Errors
///
/// Returns an error on storage failure.
pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, email, name, role, created_at_us FROM users WHERE email = ?1",
        [email],
        map_user,
    )
    .optional()
    .map_err(TrackerError::from)
}

/// Fetch an account by id.
///
/// # Errors
///
/// Returns `NotFound` when no such user exists.
pub fn get_user(conn: &Connection, user_id: i64) -> Result<User> {
    conn.query_row(
        "SELECT id, email, name, role, created_at_us FROM users WHERE id = ?1",
        [user_id],
        map_user,
    )
    .optional()?
    .ok_or_else(|| TrackerError::not_found("user", user_id))
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role_text: String = row.get(3)?;
    let role = Role::from_str(&role_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        role,
        created_at_us: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{authenticate, find_by_email, get_user, hash_password, register};
    use crate::db;
    use crate::error::TrackerError;
    use crate::model::user::Role;

    #[test]
    fn register_then_authenticate() {
        let conn = db::open_in_memory().expect("open db");
        let id = register(&conn, "alice@example.com", "hunter2", "Alice", Role::User)
            .expect("register");

        let user = authenticate(&conn, "alice@example.com", "hunter2")
            .expect("authenticate")
            .expect("credentials must match");
        assert_eq!(user.id, id);
        assert_eq!(user.name, "Alice");
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn wrong_password_and_unknown_email_return_none() {
        let conn = db::open_in_memory().expect("open db");
        register(&conn, "alice@example.com", "hunter2", "Alice", Role::User).expect("register");

        assert!(
            authenticate(&conn, "alice@example.com", "hunter3")
                .expect("authenticate")
                .is_none()
        );
        assert!(
            authenticate(&conn, "bob@example.com", "hunter2")
                .expect("authenticate")
                .is_none()
        );
    }

    #[test]
    fn duplicate_email_is_a_conflict_and_first_record_survives() {
        let conn = db::open_in_memory().expect("open db");
        register(&conn, "alice@example.com", "hunter2", "Alice", Role::User).expect("register");

        let err = register(&conn, "alice@example.com", "other", "Impostor", Role::Admin)
            .expect_err("second registration must fail");
        assert!(matches!(err, TrackerError::Conflict(_)));

        let user = find_by_email(&conn, "alice@example.com")
            .expect("lookup")
            .expect("original user present");
        assert_eq!(user.name, "Alice");
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let conn = db::open_in_memory().expect("open db");
        for (email, password, name) in [
            ("", "pw", "Name"),
            ("a@example.com", "  ", "Name"),
            ("a@example.com", "pw", ""),
        ] {
            let err = register(&conn, email, password, name, Role::User)
                .expect_err("blank field must fail");
            assert!(matches!(err, TrackerError::InvalidArgument(_)));
        }
    }

    #[test]
    fn stored_credential_is_a_digest_not_the_password() {
        let conn = db::open_in_memory().expect("open db");
        register(&conn, "alice@example.com", "hunter2", "Alice", Role::User).expect("register");

        let stored: String = conn
            .query_row("SELECT credential_hash FROM users WHERE id = 1", [], |r| {
                r.get(0)
            })
            .expect("read hash");
        assert_ne!(stored, "hunter2");
        assert_eq!(stored.len(), 64);
        assert_eq!(stored, hash_password("hunter2"));
    }

    #[test]
    fn get_user_reports_not_found() {
        let conn = db::open_in_memory().expect("open db");
        let err = get_user(&conn, 99).expect_err("missing user");
        assert!(matches!(err, TrackerError::NotFound { entity: "user", .. }));
    }
}
