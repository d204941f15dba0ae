//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: readable text for humans, stable JSON for scripts.

use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use tkt_core::TrackerError;

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-oriented text.
    Human,
    /// Machine-readable JSON (one object per result, or a JSON array).
    Json,
}

/// Core resolution logic, separated from I/O for testability.
///
/// `json_flag` — the `--json` flag.
/// `format_env` — the value of `TKT_FORMAT` if set.
/// `is_tty` — true if stdout is a TTY (reserved; both defaults are Human).
fn resolve_output_mode_inner(json_flag: bool, format_env: Option<&str>, _is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }
    match format_env.map(str::to_lowercase).as_deref() {
        Some("json") => OutputMode::Json,
        _ => OutputMode::Human,
    }
}

/// Resolve the output mode from the `--json` flag and `TKT_FORMAT`.
pub fn resolve_output_mode(json_flag: bool) -> OutputMode {
    let env_val = std::env::var("TKT_FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(json_flag, env_val.as_deref(), is_tty)
}

/// A structured error with optional hint and stable error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional hint for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Machine-readable error code (e.g. "E2002").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
            code: None,
        }
    }

    /// Create an error with a hint and error code.
    pub fn with_details(
        message: impl Into<String>,
        hint: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            hint: Some(hint.into()),
            code: Some(code.into()),
        }
    }
}

impl From<&TrackerError> for CliError {
    fn from(err: &TrackerError) -> Self {
        Self {
            message: err.to_string(),
            hint: err.hint().map(str::to_string),
            code: Some(err.code().to_string()),
        }
    }
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode, the value is serialized with `serde_json`. In human mode,
/// the provided `human_fn` closure produces the text output.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Human => human_fn(value, &mut out)?,
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Human => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref hint) = error.hint {
                writeln!(out, "  hint: {hint}")?;
            }
        }
    }
    Ok(())
}

/// Render a success message to stdout.
pub fn render_success(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "ok": true, "message": message });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Human => {
            writeln!(out, "✓ {message}")?;
        }
    }
    Ok(())
}

/// Report a [`TrackerError`] on stderr and convert it to a process failure.
pub fn fail(mode: OutputMode, err: &TrackerError) -> anyhow::Error {
    let _ = render_error(mode, &CliError::from(err));
    anyhow::anyhow!("{err}")
}

/// Format a microsecond UTC timestamp for human output.
pub fn format_us(timestamp_us: i64) -> String {
    chrono::DateTime::from_timestamp_micros(timestamp_us)
        .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}
