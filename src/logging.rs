//! Logger bootstrap.
//!
//! Diagnostics go to stderr through `flexi_logger` so that stdout stays free
//! for the JSON report.

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

const DEFAULT_LEVEL: &str = "info";
const DEBUG_LEVEL: &str = "debug";

/// Pick the log spec: an explicit `--log-level` wins, then the debug flag.
pub fn level_spec(debug: bool, override_spec: Option<&str>) -> &str {
    match override_spec {
        Some(spec) if !spec.trim().is_empty() => spec.trim(),
        _ if debug => DEBUG_LEVEL,
        _ => DEFAULT_LEVEL,
    }
}

/// Start the logger. `RUST_LOG`, when set, takes precedence over `spec`.
///
/// The returned handle must stay alive for the rest of the run.
pub fn init_logging(spec: &str) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(spec)
        .with_context(|| format!("invalid log level `{}`", spec))?
        .log_to_stderr()
        .format(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")
}
