//! Tool registration and execution errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// A tool definition failed structural validation.
    Validation,
    /// A registration targeted a name that is already taken.
    DuplicateTool,
    /// Definition, file, or directory registration failed downstream.
    Registration,
    NotFound,
    InvalidArguments,
    Execution,
    Timeout,
    Cancelled,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub tool_name: Option<String>,
    pub handler: Option<String>,
    pub source_path: Option<PathBuf>,
    pub cause: Option<Box<ToolError>>,
    /// Per-file failures of a directory batch, in the order they were attempted.
    pub failures: Vec<ToolError>,
    /// Names a directory batch did register before reporting its failures.
    pub registered: Vec<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tool_name: None,
            handler: None,
            source_path: None,
            cause: None,
            failures: Vec::new(),
            registered: Vec::new(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Validation, message)
    }

    pub fn duplicate(tool_name: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        Self::new(
            ToolErrorKind::DuplicateTool,
            format!("tool '{tool_name}' is already registered; pass allow_override to replace it"),
        )
        .with_tool_name(tool_name)
    }

    pub fn registration(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Registration, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn tool_not_found(tool_name: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        Self::not_found(format!("tool '{tool_name}' is not registered")).with_tool_name(tool_name)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Cancelled, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Other, message)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    pub fn with_source_path(mut self, path: impl AsRef<Path>) -> Self {
        self.source_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_cause(mut self, cause: ToolError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn with_failures(mut self, failures: Vec<ToolError>) -> Self {
        self.failures = failures;
        self
    }

    pub fn with_registered(mut self, registered: Vec<String>) -> Self {
        self.registered = registered;
        self
    }

    /// Walks the cause chain down to the innermost error.
    pub fn root_cause(&self) -> &ToolError {
        let mut current = self;
        while let Some(cause) = current.cause.as_deref() {
            current = cause;
        }
        current
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::Validation
                | ToolErrorKind::DuplicateTool
                | ToolErrorKind::NotFound
                | ToolErrorKind::InvalidArguments
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut context = Vec::new();
        if let Some(tool_name) = &self.tool_name {
            context.push(format!("tool={tool_name}"));
        }
        if let Some(handler) = &self.handler {
            context.push(format!("handler={handler}"));
        }
        if let Some(path) = &self.source_path {
            context.push(format!("path={}", path.display()));
        }

        if context.is_empty() {
            write!(f, "{:?}: {}", self.kind, self.message)?;
        } else {
            write!(f, "{:?} [{}]: {}", self.kind, context.join(", "), self.message)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }

        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }

        Ok(())
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_methods_classify_user_errors() {
        assert!(ToolError::duplicate("echo").is_user_error());
        assert!(ToolError::tool_not_found("echo").is_user_error());
        assert!(ToolError::validation("bad name").is_user_error());
        assert!(!ToolError::timeout("slow").is_user_error());
        assert!(!ToolError::registration("broken handler").is_user_error());
    }

    #[test]
    fn context_fields_are_included_in_display() {
        let error = ToolError::registration("failed to register tool")
            .with_tool_name("lookup")
            .with_handler("sisyphus.tools.lookup.run")
            .with_source_path("defs/lookup.yaml");

        let rendered = error.to_string();
        assert!(rendered.contains("tool=lookup"));
        assert!(rendered.contains("handler=sisyphus.tools.lookup.run"));
        assert!(rendered.contains("defs/lookup.yaml"));
    }

    #[test]
    fn cause_is_rendered_and_exposed_as_source() {
        let error = ToolError::registration("failed to register tool 'ghost'")
            .with_tool_name("ghost")
            .with_cause(ToolError::not_found("module 'missing.module' not found"));

        assert!(error.to_string().contains("module 'missing.module' not found"));
        assert!(error.source().is_some());
        assert_eq!(error.root_cause().kind, ToolErrorKind::NotFound);
    }

    #[test]
    fn batch_failures_are_listed_one_per_line() {
        let error = ToolError::registration("failed to register 2 tool definition(s)")
            .with_failures(vec![
                ToolError::registration("bad").with_source_path("a.yaml"),
                ToolError::registration("worse").with_source_path("b.yaml"),
            ])
            .with_registered(vec!["ok_tool".to_string()]);

        let rendered = error.to_string();
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains("a.yaml"));
        assert!(rendered.contains("b.yaml"));
        assert_eq!(error.registered, vec!["ok_tool".to_string()]);
    }
}
