//! `read_file` and `write_file` handlers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;
use stooling::{
    HandlerModule, ToolArgs, ToolResult, optional_bool, optional_string, optional_u64,
    required_string,
};
use tempfile::NamedTempFile;

pub const MODULE_PATH: &str = "sisyphus.tools.filesystem";

const ENCODING: &str = "utf-8";

pub fn module() -> HandlerModule {
    HandlerModule::new()
        .with_sync("read_file", read_file)
        .with_sync("write_file", write_file)
}

macro_rules! try_arg {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(error) => return ToolResult::error(error.message),
        }
    };
}

/// Only UTF-8 text is supported; other encodings are rejected up front.
fn check_encoding(args: &ToolArgs) -> Result<(), ToolResult> {
    match optional_string(args, "encoding") {
        Ok(None) => Ok(()),
        Ok(Some(encoding)) if matches!(encoding.to_ascii_lowercase().as_str(), "utf-8" | "utf8") => {
            Ok(())
        }
        Ok(Some(encoding)) => Err(ToolResult::error(format!("Invalid encoding: {encoding}"))),
        Err(error) => Err(ToolResult::error(error.message)),
    }
}

/// Reads a UTF-8 file, optionally limited to a 1-indexed inclusive line range.
pub fn read_file(args: &ToolArgs) -> ToolResult {
    let file_path = try_arg!(required_string(args, "file_path"));
    let start_line = try_arg!(optional_u64(args, "start_line"));
    let end_line = try_arg!(optional_u64(args, "end_line"));
    if let Err(result) = check_encoding(args) {
        return result;
    }

    let path = Path::new(&file_path);
    if !path.exists() {
        return ToolResult::error(format!("File not found: {file_path}"));
    }
    if !path.is_file() {
        return ToolResult::error(format!("Not a file: {file_path}"));
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == io::ErrorKind::PermissionDenied => {
            return ToolResult::error(format!("Permission denied: {file_path}"));
        }
        Err(error) => {
            return ToolResult::error(format!("Unexpected error reading {file_path}: {error}"));
        }
    };
    let file_size = bytes.len();
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => {
            return ToolResult::error(format!(
                "Encoding error (possibly binary file): {file_path} - {error}"
            ));
        }
    };

    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let total_lines = lines.len();

    let (content, lines_read) = if start_line.is_none() && end_line.is_none() {
        (text.clone(), total_lines)
    } else {
        if start_line == Some(0) {
            return ToolResult::error("Invalid start_line: 0 (must be >= 1)");
        }
        if end_line == Some(0) {
            return ToolResult::error("Invalid end_line: 0 (must be >= 1)");
        }
        if let (Some(start), Some(end)) = (start_line, end_line)
            && start > end
        {
            return ToolResult::error(format!(
                "Invalid range: start_line ({start}) > end_line ({end})"
            ));
        }

        let start_index = start_line.map_or(0, |start| (start - 1) as usize);
        if start_index >= total_lines {
            return ToolResult::error(format!(
                "start_line ({}) exceeds file length ({total_lines} lines)",
                start_index + 1
            ));
        }
        let end_index = end_line.map_or(total_lines, |end| (end as usize).min(total_lines));
        let selected = &lines[start_index..end_index];
        (selected.concat(), selected.len())
    };

    ToolResult::success(content)
        .with_metadata("lines_read", lines_read)
        .with_metadata("total_lines", total_lines)
        .with_metadata("file_size", file_size)
        .with_metadata("encoding", ENCODING)
}

/// Writes `content` through a temporary file in the target directory, then
/// renames it over the destination.
pub fn write_file(args: &ToolArgs) -> ToolResult {
    let file_path = try_arg!(required_string(args, "file_path"));
    let content = try_arg!(required_string(args, "content"));
    let create_dirs = try_arg!(optional_bool(args, "create_dirs")).unwrap_or(true);
    let overwrite = try_arg!(optional_bool(args, "overwrite")).unwrap_or(true);
    if let Err(result) = check_encoding(args) {
        return result;
    }

    let path = Path::new(&file_path);
    if path.exists() && !overwrite {
        return ToolResult::error(format!(
            "File already exists and overwrite=False: {file_path}"
        ));
    }
    if path.is_dir() {
        return ToolResult::error(format!("Not a file: {file_path}"));
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        if !create_dirs {
            return ToolResult::error(format!(
                "Parent directory does not exist and create_dirs=False: {}",
                parent.display()
            ));
        }
        if let Err(error) = fs::create_dir_all(parent) {
            return ToolResult::error(format!(
                "Failed to create parent directory {}: {error}",
                parent.display()
            ));
        }
    }

    if let Err(error) = write_atomically(parent, path, content.as_bytes()) {
        return match error.kind() {
            io::ErrorKind::PermissionDenied => {
                ToolResult::error(format!("Permission denied: {file_path}"))
            }
            _ => ToolResult::error(format!("I/O error writing to {file_path}: {error}")),
        };
    }

    let mut lines_written = content.matches('\n').count();
    if !content.is_empty() && !content.ends_with('\n') {
        lines_written += 1;
    }

    ToolResult::success(Value::Null)
        .with_metadata("bytes_written", content.len())
        .with_metadata("lines_written", lines_written)
        .with_metadata("encoding", ENCODING)
}

fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(target).map_err(|error| error.error)?;
    Ok(())
}
