use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The four ticket priorities, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Numeric ordering key for the priority queue.
///
/// Unknown values (rows written by older iterations or edited by hand)
/// sort after every known priority.
#[must_use]
pub fn priority_rank(priority: &str) -> u8 {
    match priority {
        "Critical" => 1,
        "High" => 2,
        "Medium" => 3,
        "Low" => 4,
        _ => 5,
    }
}

/// The four lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "submitted")]
    Submitted,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "solved")]
    Solved,
    #[serde(rename = "closed")]
    Closed,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::InProgress => "in progress",
            Self::Solved => "solved",
            Self::Closed => "closed",
        }
    }

    /// Position in the forward chain, used by the forward-only policy.
    const fn ordinal(self) -> u8 {
        match self {
            Self::Submitted => 0,
            Self::InProgress => 1,
            Self::Solved => 2,
            Self::Closed => 3,
        }
    }

    /// A ticket in either of these states still accepts solvers.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Submitted | Self::InProgress)
    }
}

/// Which status transitions the lifecycle controller permits.
///
/// The default is deliberately permissive: operators routinely reopen
/// closed tickets to correct mistakes. The forward-only machine is the
/// stricter alternative with `closed` as a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    ForwardOnly,
}

impl TransitionPolicy {
    /// Whether a transition from `from` to `to` is allowed under this policy.
    #[must_use]
    pub fn allows(self, from: Status, to: Status) -> bool {
        match self {
            Self::Permissive => true,
            Self::ForwardOnly => to.ordinal() > from.ordinal(),
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submitted" => Ok(Self::Submitted),
            "in progress" | "in-progress" => Ok(Self::InProgress),
            "solved" => Ok(Self::Solved),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

/// A ticket row joined with submitter and (when present) assignee names,
/// as returned by every list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRow {
    pub id: i64,
    pub display_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Stored verbatim; unknown values are kept so the priority queue can
    /// rank them last instead of failing the whole listing.
    pub priority: String,
    pub status: String,
    pub submitted_by: i64,
    pub submitter_name: String,
    pub assigned_to: Option<i64>,
    pub assignee_name: Option<String>,
    pub created_at_us: i64,
    pub deadline_us: i64,
    pub resolution: Option<String>,
    pub resolved_at_us: Option<i64>,
}
