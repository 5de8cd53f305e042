//! Running external media tools (`ffmpeg`, `ogg123`, `lame`).

use std::ffi::{OsStr, OsString};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::debug;

/// Longest stderr tail kept in a [`ToolError::Failed`].
const STDERR_TAIL_BYTES: usize = 2000;

/// Errors from running an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The binary could not be started at all.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited unsuccessfully.
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        /// Full command line, space-joined.
        command: String,
        /// Exit status.
        status: ExitStatus,
        /// Tail of the tool's stderr.
        stderr: String,
    },
}

/// Space-joined command line for logs and error messages.
pub fn command_line(program: &OsStr, args: &[OsString]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(OsString::as_os_str))
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program` with `args`, waiting for it to exit.
///
/// Stdout is discarded; stderr is captured and returned in the error when
/// the exit status is non-zero.
///
/// # Errors
///
/// Returns [`ToolError::Spawn`] if the binary cannot be started and
/// [`ToolError::Failed`] on a non-zero exit.
pub async fn run_tool(program: &OsStr, args: &[OsString]) -> Result<(), ToolError> {
    let command = command_line(program, args);
    debug!(command = %command, "running external tool");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| ToolError::Spawn {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    let tail_start = stderr
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| stderr.len().saturating_sub(i) <= STDERR_TAIL_BYTES)
        .unwrap_or(stderr.len());

    Err(ToolError::Failed {
        command,
        status: output.status,
        stderr: stderr.get(tail_start..).unwrap_or_default().to_owned(),
    })
}
