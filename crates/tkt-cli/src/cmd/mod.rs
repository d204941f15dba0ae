//! Command handlers, one module per subcommand.

pub mod assign;
pub mod available;
pub mod calendar;
pub mod event;
pub mod export;
pub mod init;
pub mod list;
pub mod login;
pub mod register;
pub mod show;
pub mod stats;
pub mod status;
pub mod submit;
