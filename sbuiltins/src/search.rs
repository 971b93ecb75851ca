//! Regex `search` handler over a file or directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use regex::RegexBuilder;
use serde_json::{Value, json};
use stooling::{
    HandlerModule, ToolArgs, ToolResult, optional_bool, optional_string, optional_u64,
    required_string,
};
use walkdir::{DirEntry, WalkDir};

pub const MODULE_PATH: &str = "sisyphus.tools.search";

const DEFAULT_MAX_RESULTS: u64 = 100;

pub fn module() -> HandlerModule {
    HandlerModule::new().with_sync("search", search)
}

struct SearchRequest {
    pattern: String,
    root: String,
    file_pattern: Option<String>,
    case_sensitive: bool,
    max_results: usize,
}

impl SearchRequest {
    fn from_args(args: &ToolArgs) -> Result<Self, String> {
        let pattern = required_string(args, "pattern").map_err(|error| error.message)?;
        let root = optional_string(args, "path")
            .map_err(|error| error.message)?
            .unwrap_or_else(|| ".".to_string());
        let file_pattern = optional_string(args, "file_pattern").map_err(|error| error.message)?;
        let case_sensitive = optional_bool(args, "case_sensitive")
            .map_err(|error| error.message)?
            .unwrap_or(true);
        let max_results = optional_u64(args, "max_results")
            .map_err(|error| error.message)?
            .unwrap_or(DEFAULT_MAX_RESULTS);

        Ok(Self {
            pattern,
            root,
            file_pattern,
            case_sensitive,
            max_results: usize::try_from(max_results).unwrap_or(usize::MAX),
        })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn collect_files(root: &Path, filter: Option<&GlobMatcher>) -> Vec<PathBuf> {
    let matches_filter = |path: &Path| {
        filter.is_none_or(|matcher| path.file_name().is_some_and(|name| matcher.is_match(name)))
    };

    if root.is_file() {
        return if matches_filter(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .filter(|path| matches_filter(path))
        .collect()
}

/// Searches files under `path` for lines matching a regex.
///
/// Hidden files and directories are skipped, unreadable files are ignored,
/// and invalid UTF-8 is replaced rather than rejected. Match offsets are
/// character positions within the line.
pub fn search(args: &ToolArgs) -> ToolResult {
    let request = match SearchRequest::from_args(args) {
        Ok(request) => request,
        Err(message) => return ToolResult::error(message),
    };

    let root = Path::new(&request.root);
    if !root.exists() {
        return ToolResult::error(format!("Path does not exist: {}", request.root));
    }

    let regex = match RegexBuilder::new(&request.pattern)
        .case_insensitive(!request.case_sensitive)
        .build()
    {
        Ok(regex) => regex,
        Err(error) => {
            return ToolResult::error(format!(
                "Invalid regex pattern: {} - {error}",
                request.pattern
            ));
        }
    };

    let filter = match request.file_pattern.as_deref().map(Glob::new).transpose() {
        Ok(glob) => glob.map(|glob| glob.compile_matcher()),
        Err(error) => return ToolResult::error(format!("Invalid file pattern: {error}")),
    };

    let mut matches: Vec<Value> = Vec::new();
    let mut files_searched = 0usize;

    for path in collect_files(root, filter.as_ref()) {
        if matches.len() >= request.max_results {
            break;
        }
        let Ok(bytes) = fs::read(&path) else {
            continue;
        };
        files_searched += 1;

        let text = String::from_utf8_lossy(&bytes);
        for (index, line) in text.lines().enumerate() {
            let Some(found) = regex.find(line) else {
                continue;
            };
            let match_start = line[..found.start()].chars().count();
            let match_end = match_start + found.as_str().chars().count();
            matches.push(json!({
                "file": path.display().to_string(),
                "line": index + 1,
                "content": line,
                "match_start": match_start,
                "match_end": match_end,
            }));
            if matches.len() >= request.max_results {
                break;
            }
        }
    }

    let matches_found = matches.len();
    tracing::debug!(
        event = "search_completed",
        pattern = %request.pattern,
        matches_found,
        files_searched
    );

    ToolResult::success(matches)
        .with_metadata("matches_found", matches_found)
        .with_metadata("files_searched", files_searched)
        .with_metadata("pattern", request.pattern.clone())
        .with_metadata("truncated", matches_found >= request.max_results)
}
