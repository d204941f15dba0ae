//! tkt-core library.
//!
//! SQLite-backed engine for the tkt ticket tracker: ticket storage,
//! solver assignment, status lifecycle, deadline calendar, and the
//! priority queue view.
//!
//! # Conventions
//!
//! - **Errors**: engine operations return [`TrackerError`] with stable
//!   `E`-codes; config and other outer plumbing use `anyhow::Result`.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod assign;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod store;

pub use error::{Result, TrackerError};
