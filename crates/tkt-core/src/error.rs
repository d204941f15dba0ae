//! Structured error surface for the ticket engine.
//!
//! Every fallible operation returns [`TrackerError`] rather than panicking.
//! Callers (the CLI, an export job) match on the variant or use the stable
//! machine code from [`TrackerError::code`] for decision making.

use thiserror::Error;

/// All failure modes the engine reports to callers.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A uniqueness rule was violated (duplicate email, duplicate display
    /// identifier, or a duplicate claim under the rejecting policy).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An operation referenced a ticket or user that does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A caller-supplied value failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A role-gated operation was invoked by a non-privileged actor.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The underlying SQLite store failed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl TrackerError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "E2001",
            Self::NotFound { .. } => "E2002",
            Self::InvalidArgument(_) => "E2003",
            Self::Unauthorized(_) => "E2004",
            Self::Storage(_) => "E5001",
        }
    }

    /// Optional remediation hint that can be surfaced to end users.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Conflict(_) => Some("The record already exists; use a different value."),
            Self::NotFound { .. } => Some("Check the id with `tkt list`."),
            Self::InvalidArgument(_) => None,
            Self::Unauthorized(_) => Some("This operation requires an admin account."),
            Self::Storage(_) => Some("Check disk space and database file permissions."),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Convenience alias used throughout the engine.
pub type Result<T, E = TrackerError> = std::result::Result<T, E>;

/// Map a SQLite failure to [`TrackerError::Conflict`] when it is a
/// uniqueness violation, passing everything else through as `Storage`.
pub(crate) fn conflict_on_unique(err: rusqlite::Error, message: &str) -> TrackerError {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            return TrackerError::Conflict(message.to_string());
        }
    }
    TrackerError::Storage(err)
}
