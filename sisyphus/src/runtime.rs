//! Runtime wiring: one registry, one executor, one orchestrator.

use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    CompositeToolHooks, ExecutorConfig, MetricsObservabilityHooks, SafeToolHooks, ToolError,
    ToolExecutionHooks, ToolExecutor, ToolOrchestrator, ToolRegistry, TracingObservabilityHooks,
};

/// Inputs for [`build_runtime`].
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Directory of YAML definitions loaded after the built-ins.
    pub definitions_dir: Option<PathBuf>,
    /// Glob applied to file names in `definitions_dir`; defaults to `*.{yaml,yml}`.
    pub definition_pattern: Option<String>,
    pub include_builtins: bool,
    pub allow_override: bool,
    pub executor: ExecutorConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            definitions_dir: None,
            definition_pattern: None,
            include_builtins: true,
            allow_override: false,
            executor: ExecutorConfig::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definitions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.definitions_dir = Some(dir.into());
        self
    }

    pub fn with_definition_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.definition_pattern = Some(pattern.into());
        self
    }

    pub fn with_builtins(mut self, include_builtins: bool) -> Self {
        self.include_builtins = include_builtins;
        self
    }

    pub fn with_allow_override(mut self, allow_override: bool) -> Self {
        self.allow_override = allow_override;
        self
    }

    pub fn with_executor(mut self, executor: ExecutorConfig) -> Self {
        self.executor = executor;
        self
    }
}

#[derive(Clone)]
pub struct RuntimeBundle {
    pub registry: Arc<ToolRegistry>,
    pub orchestrator: ToolOrchestrator,
}

impl RuntimeBundle {
    pub fn executor(&self) -> &ToolExecutor {
        self.orchestrator.executor()
    }
}

/// Tracing and metrics hooks, each isolated so a panic in one is swallowed.
pub fn default_hooks() -> Arc<dyn ToolExecutionHooks> {
    Arc::new(
        CompositeToolHooks::new()
            .with(SafeToolHooks::new(TracingObservabilityHooks))
            .with(SafeToolHooks::new(MetricsObservabilityHooks)),
    )
}

/// Builds a fresh registry, populates it, and wires an orchestrator over it.
///
/// Built-in handler modules are always installed so user definitions can
/// name them; `include_builtins` only controls whether their definitions are
/// registered. A failing definitions directory fails the whole build and
/// the returned error carries every per-file failure.
pub fn build_runtime(config: RuntimeConfig) -> Result<RuntimeBundle, ToolError> {
    let registry = ToolRegistry::new();
    sbuiltins::install(&registry);

    if config.include_builtins {
        sbuiltins::register_definitions(&registry, config.allow_override)?;
    }

    if let Some(dir) = config.definitions_dir.as_deref() {
        registry.register_from_source_directory(
            dir,
            config.definition_pattern.as_deref(),
            config.allow_override,
        )?;
    }

    tracing::info!(
        phase = "runtime",
        event = "runtime_built",
        tools = registry.len(),
        builtins = config.include_builtins
    );

    let registry = Arc::new(registry);
    let executor = ToolExecutor::with_config(config.executor).with_hooks(default_hooks());
    let orchestrator = ToolOrchestrator::with_executor(Arc::clone(&registry), executor);

    Ok(RuntimeBundle {
        registry,
        orchestrator,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use tempfile::TempDir;

    use crate::{ExecutorConfig, ToolErrorKind};

    use super::{RuntimeConfig, build_runtime};

    const NOTE_TOOL: &str = "\
name: read_note
description: Reads a note through the built-in file reader.
handler: sisyphus.tools.filesystem.read_file
parameters:
  type: object
  properties:
    file_path:
      type: string
  required: [file_path]
";

    #[test]
    fn default_runtime_registers_builtins() {
        let runtime = build_runtime(RuntimeConfig::default()).expect("runtime should build");

        assert_eq!(
            runtime.registry.list(),
            vec!["read_file", "search", "terminal", "write_file"]
        );
        assert_eq!(
            runtime.executor().config().default_timeout,
            Duration::from_secs(60)
        );
    }

    #[test]
    fn definitions_dir_can_reuse_builtin_handlers() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("read_note.yaml"), NOTE_TOOL).expect("fixture");

        let runtime = build_runtime(
            RuntimeConfig::new()
                .with_builtins(false)
                .with_definitions_dir(dir.path())
                .with_executor(
                    ExecutorConfig::default().with_default_timeout(Duration::from_secs(5)),
                ),
        )
        .expect("runtime should build");

        assert_eq!(runtime.registry.list(), vec!["read_note"]);
        assert_eq!(
            runtime.executor().config().default_timeout,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn duplicate_of_a_builtin_needs_override() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(
            dir.path().join("read_file.yaml"),
            NOTE_TOOL.replace("name: read_note", "name: read_file"),
        )
        .expect("fixture");
        let config = RuntimeConfig::new().with_definitions_dir(dir.path());

        let error = build_runtime(config.clone())
            .err()
            .expect("duplicate should fail");
        assert_eq!(error.kind, ToolErrorKind::Registration);
        assert_eq!(error.failures.len(), 1);
        assert_eq!(error.failures[0].root_cause().kind, ToolErrorKind::DuplicateTool);

        let runtime = build_runtime(config.with_allow_override(true)).expect("override applies");
        assert_eq!(
            runtime
                .registry
                .get_definition("read_file")
                .map(|definition| definition.description().to_string()),
            Some("Reads a note through the built-in file reader.".to_string())
        );
    }
}
