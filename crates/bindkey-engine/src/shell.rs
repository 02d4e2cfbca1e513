//! Blocking process execution with merged output capture.

use std::{env, process::Command};

use tracing::{debug, info};

use crate::{Error, Result};

/// Merge stdout and stderr into one message, trimming blank lines at the
/// start and end.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::new();
    let out = String::from_utf8_lossy(stdout);
    let err = String::from_utf8_lossy(stderr);
    if !out.is_empty() {
        combined.push_str(&out);
    }
    if !err.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&err);
    }

    let lines: Vec<&str> = combined.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(s), Some(e)) if s <= e => lines[s..=e].join("\n"),
        _ => String::new(),
    }
}

/// Run a program to completion, capturing merged stdout/stderr. A non-zero
/// exit maps to [`Error::ScriptFailed`] carrying the captured output.
///
/// Blocking; intended to be called inside `spawn_blocking`.
pub(crate) fn run_command_blocking(program: &str, args: &[&str]) -> Result<()> {
    let output = Command::new(program).args(args).output()?;
    let combined = combine_output(&output.stdout, &output.stderr);
    if output.status.success() {
        if !combined.is_empty() {
            debug!(program, output = %combined, "process_output");
        }
        Ok(())
    } else {
        Err(Error::ScriptFailed(combined))
    }
}

/// Run `source` through the user's shell (`$SHELL -c`, falling back to
/// `/bin/zsh`). Blocking; intended to be called inside `spawn_blocking`.
pub(crate) fn run_shell_blocking(source: &str) -> Result<()> {
    info!(command = %source, "executing_shell_command");
    let shell = env::var("SHELL").unwrap_or_else(|_| "/bin/zsh".to_string());
    run_command_blocking(&shell, &["-c", source])
}
