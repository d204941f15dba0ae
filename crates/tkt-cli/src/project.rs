//! Workspace discovery and per-invocation context.
//!
//! Commands run against a `.tkt` directory found by walking up from the
//! current directory (or an explicit `--db` path), with the policy config
//! loaded from the same directory and the acting user resolved from
//! `--user` / `TKT_USER`.

use anyhow::{Context as _, Result, bail};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tkt_core::auth;
use tkt_core::config::{self, TrackerConfig};
use tkt_core::db;
use tkt_core::model::user::User;

/// Everything a command handler needs to touch the tracker.
#[derive(Debug)]
pub struct Project {
    pub conn: Connection,
    pub config: TrackerConfig,
}

impl Project {
    /// Open the tracker for `cwd`, honoring an explicit database path.
    ///
    /// With `--db` the config next to the database file is used when
    /// present; otherwise the nearest `.tkt` directory provides both.
    pub fn open(cwd: &Path, db_flag: Option<&Path>) -> Result<Self> {
        let (db_path, config_dir) = match db_flag {
            Some(path) => {
                let dir = path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
                (path.to_path_buf(), dir)
            }
            None => {
                let Some(tracker_dir) = config::find_tracker_dir(cwd) else {
                    bail!(
                        "no {} directory found here or in any parent; run `tkt init` first",
                        config::TRACKER_DIR
                    );
                };
                (tracker_dir.join(config::DB_FILE), tracker_dir)
            }
        };

        tracing::debug!(db = %db_path.display(), "opening tracker database");
        let conn = db::open(&db_path)
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;
        let config = config::load_config(&config_dir)?;
        Ok(Self { conn, config })
    }

    /// Resolve the acting user from the `--user` flag or `TKT_USER`.
    pub fn actor(&self, user_flag: Option<&str>) -> Result<User> {
        let email = match user_flag {
            Some(email) => email.to_string(),
            None => std::env::var("TKT_USER")
                .context("no acting user: pass --user <EMAIL> or set TKT_USER")?,
        };
        auth::find_by_email(&self.conn, &email)?
            .with_context(|| format!("no account registered for '{email}'"))
    }
}

/// Create a fresh `.tkt` workspace under `cwd`.
///
/// Idempotent on the directory itself; the database schema is migrated in
/// place if the file already exists.
pub fn init_workspace(cwd: &Path) -> Result<PathBuf> {
    let tracker_dir = cwd.join(config::TRACKER_DIR);
    std::fs::create_dir_all(&tracker_dir)
        .with_context(|| format!("failed to create {}", tracker_dir.display()))?;
    db::open(&tracker_dir.join(config::DB_FILE))?;
    Ok(tracker_dir)
}

#[cfg(test)]
mod tests {
    use super::{Project, init_workspace};
    use tkt_core::auth;
    use tkt_core::model::user::Role;

    #[test]
    fn init_then_open_from_a_nested_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        init_workspace(dir.path()).expect("init");

        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).expect("mkdir");
        let project = Project::open(&nested, None).expect("open walks up");
        // Schema is in place: the users table answers queries.
        let count: i64 = project
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .expect("query");
        assert_eq!(count, 0);
    }

    #[test]
    fn open_without_a_workspace_suggests_init() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Project::open(dir.path(), None).expect_err("no workspace");
        assert!(err.to_string().contains("tkt init"));
    }

    #[test]
    fn explicit_db_flag_bypasses_discovery() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("standalone.db");
        let project = Project::open(dir.path(), Some(&db_path)).expect("open explicit");
        drop(project);
        assert!(db_path.exists());
    }

    #[test]
    fn actor_resolution_requires_a_registered_account() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("t.db");
        let project = Project::open(dir.path(), Some(&db_path)).expect("open");

        assert!(project.actor(Some("ghost@example.com")).is_err());

        auth::register(&project.conn, "alice@example.com", "hunter2", "Alice", Role::User)
            .expect("register");
        let user = project.actor(Some("alice@example.com")).expect("resolve");
        assert_eq!(user.name, "Alice");
    }
}
