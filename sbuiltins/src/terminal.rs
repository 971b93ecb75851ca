//! Asynchronous `terminal` handler that runs a command and captures its output.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde_json::json;
use stooling::{
    HandlerModule, ToolArgs, ToolResult, optional_bool, optional_f64, optional_string,
    required_string,
};
use tokio::process::Command;

pub const MODULE_PATH: &str = "sisyphus.tools.terminal";

const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

pub fn module() -> HandlerModule {
    HandlerModule::new().with_async("terminal", terminal)
}

/// Splits a command line into words using POSIX shell quoting rules.
pub fn split_command(command: &str) -> Result<Vec<String>, String> {
    shlex::split(command).ok_or_else(|| "No closing quotation or trailing escape".to_string())
}

fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut shell = Command::new("cmd");
        shell.arg("/C").arg(command);
        shell
    }
    #[cfg(not(windows))]
    {
        let mut shell = Command::new("sh");
        shell.arg("-c").arg(command);
        shell
    }
}

/// Runs `command` with a timeout, returning `{stdout, stderr, returncode}`.
///
/// Without `shell` the command line is split into words and executed
/// directly. A non-zero exit status is an error result; an expired timeout
/// kills the child and yields a timeout result.
pub async fn terminal(args: ToolArgs) -> ToolResult {
    let started = Instant::now();

    let command = match required_string(&args, "command") {
        Ok(command) => command,
        Err(error) => return ToolResult::error(error.message),
    };
    let working_dir = match optional_string(&args, "working_dir") {
        Ok(working_dir) => working_dir.filter(|dir| !dir.is_empty()),
        Err(error) => return ToolResult::error(error.message),
    };
    let timeout_secs = match optional_f64(&args, "timeout") {
        Ok(timeout) => timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
        Err(error) => return ToolResult::error(error.message),
    };
    let use_shell = match optional_bool(&args, "shell") {
        Ok(shell) => shell.unwrap_or(false),
        Err(error) => return ToolResult::error(error.message),
    };

    let Ok(timeout) = Duration::try_from_secs_f64(timeout_secs) else {
        return ToolResult::error(format!(
            "Invalid timeout: {timeout_secs} (must be a non-negative number of seconds)"
        ));
    };

    if let Some(dir) = working_dir.as_deref() {
        let path = Path::new(dir);
        if !path.exists() {
            return ToolResult::error(format!("Working directory does not exist: {dir}"));
        }
        if !path.is_dir() {
            return ToolResult::error(format!("Working directory is not a directory: {dir}"));
        }
    }

    let (mut process, program) = if use_shell {
        (shell_command(&command), command.clone())
    } else {
        let words = match split_command(&command) {
            Ok(words) => words,
            Err(error) => return ToolResult::error(format!("Invalid command syntax: {error}")),
        };
        let Some((program, rest)) = words.split_first() else {
            return ToolResult::error("Invalid command syntax: empty command");
        };
        let mut process = Command::new(program);
        process.args(rest);
        (process, program.clone())
    };

    if let Some(dir) = working_dir.as_deref() {
        process.current_dir(dir);
    }
    process
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = match process.spawn() {
        Ok(child) => child,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return ToolResult::error(format!("Command not found: {program}"))
                .with_metadata("command", command);
        }
        Err(error) if error.kind() == io::ErrorKind::PermissionDenied => {
            return ToolResult::error(format!("Permission denied executing command: {command}"))
                .with_metadata("command", command);
        }
        Err(error) => {
            return ToolResult::error(format!("Unexpected error executing command: {error}"))
                .with_metadata("command", command)
                .with_metadata("duration", started.elapsed().as_secs_f64());
        }
    };

    // Dropping the pending future on timeout drops the child, which kills it.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(error)) => {
            return ToolResult::error(format!("Unexpected error executing command: {error}"))
                .with_metadata("command", command)
                .with_metadata("duration", started.elapsed().as_secs_f64());
        }
        Err(_) => {
            tracing::warn!(event = "command_timed_out", command = %command, timeout_secs);
            return ToolResult::timeout(format!("Command timed out after {timeout_secs} seconds"))
                .with_metadata("command", command)
                .with_metadata("timeout", timeout_secs);
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let returncode = output.status.code().unwrap_or(-1);
    let duration = started.elapsed().as_secs_f64();

    if output.status.success() {
        let working_dir = working_dir.unwrap_or_else(|| {
            std::env::current_dir()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default()
        });
        ToolResult::success(json!({
            "stdout": stdout,
            "stderr": stderr,
            "returncode": returncode,
        }))
        .with_metadata("command", command)
        .with_metadata("duration", duration)
        .with_metadata("working_dir", working_dir)
    } else {
        ToolResult::error(format!(
            "Command failed with exit code {returncode}\nstdout: {stdout}\nstderr: {stderr}"
        ))
        .with_metadata("command", command)
        .with_metadata("duration", duration)
        .with_metadata("returncode", returncode)
    }
}
