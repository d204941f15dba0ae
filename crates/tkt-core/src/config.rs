//! Tracker configuration.
//!
//! Policy knobs live in `.tkt/config.toml`, discovered by walking up from
//! the working directory. Missing files and missing keys fall back to
//! defaults; a malformed file is an error rather than a silent default.

use crate::assign::DuplicatePolicy;
use crate::model::ticket::TransitionPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory that marks a tracker workspace and holds its database and
/// config file.
pub const TRACKER_DIR: &str = ".tkt";

/// Database filename inside [`TRACKER_DIR`].
pub const DB_FILE: &str = "tkt.db";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub assign: AssignConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssignConfig {
    /// Behavior when the same user claims the same ticket twice.
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Which status transitions are legal.
    #[serde(default)]
    pub transitions: TransitionPolicy,
}

/// Find the nearest `.tkt` directory at or above `start`.
#[must_use]
pub fn find_tracker_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(TRACKER_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load the config stored in `tracker_dir`, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(tracker_dir: &Path) -> Result<TrackerConfig> {
    let path = tracker_dir.join("config.toml");
    if !path.exists() {
        return Ok(TrackerConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<TrackerConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{TrackerConfig, find_tracker_dir, load_config};
    use crate::assign::DuplicatePolicy;
    use crate::model::ticket::TransitionPolicy;

    #[test]
    fn defaults_are_reject_and_permissive() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.assign.on_duplicate, DuplicatePolicy::Reject);
        assert_eq!(cfg.lifecycle.transitions, TransitionPolicy::Permissive);
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(dir.path()).expect("load");
        assert_eq!(cfg.assign.on_duplicate, DuplicatePolicy::Reject);
    }

    #[test]
    fn partial_config_fills_the_rest_with_defaults() {
        let cfg: TrackerConfig = toml::from_str(
            r#"
[assign]
on-duplicate = "accept"
"#,
        )
        .expect("parse");
        assert_eq!(cfg.assign.on_duplicate, DuplicatePolicy::Accept);
        assert_eq!(cfg.lifecycle.transitions, TransitionPolicy::Permissive);
    }

    #[test]
    fn full_config_round_trips() {
        let cfg: TrackerConfig = toml::from_str(
            r#"
[assign]
on-duplicate = "reject"

[lifecycle]
transitions = "forward-only"
"#,
        )
        .expect("parse");
        assert_eq!(cfg.assign.on_duplicate, DuplicatePolicy::Reject);
        assert_eq!(cfg.lifecycle.transitions, TransitionPolicy::ForwardOnly);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.toml"), "[assign\nbroken")
            .expect("write config");
        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn find_tracker_dir_walks_up() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tracker = dir.path().join(".tkt");
        std::fs::create_dir_all(&tracker).expect("mkdir .tkt");
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).expect("mkdir nested");

        let found = find_tracker_dir(&nested).expect("must find tracker dir");
        assert_eq!(
            found.canonicalize().expect("canonicalize"),
            tracker.canonicalize().expect("canonicalize")
        );
    }

    #[test]
    fn find_tracker_dir_prefers_the_nearest_ancestor() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outer = dir.path().join(".tkt");
        let inner = dir.path().join("sub/.tkt");
        std::fs::create_dir_all(&outer).expect("mkdir outer");
        std::fs::create_dir_all(&inner).expect("mkdir inner");

        let found = find_tracker_dir(&dir.path().join("sub")).expect("must find");
        assert_eq!(
            found.canonicalize().expect("canonicalize"),
            inner.canonicalize().expect("canonicalize")
        );
    }
}
