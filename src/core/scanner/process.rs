// src/core/scanner/process.rs

use crate::core::error::{Result, VulnxError};
use crate::core::models::ToolName;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Runs an external tool and returns its standard output as text.
///
/// The child is killed if `limit` elapses first. A non-zero exit status is
/// logged but not treated as a failure: the tools report findings on stdout
/// regardless of how they exit.
pub async fn run_tool(tool: ToolName, program: &Path, args: &[String], limit: Duration) -> Result<String> {
    debug!(%tool, program = %program.display(), ?args, "Spawning external tool.");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| VulnxError::AdapterExecution {
            tool,
            message: format!("cannot start {}: {e}", program.display()),
        })?;

    let output = timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| VulnxError::Timeout { tool, limit })?
        .map_err(|e| VulnxError::AdapterExecution { tool, message: e.to_string() })?;

    if !output.status.success() {
        warn!(%tool, status = %output.status, "External tool exited unsuccessfully.");
    }
    debug!(%tool, bytes = output.stdout.len(), "External tool finished.");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
