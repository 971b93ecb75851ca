//! Thread-safe catalog of invocable tools keyed by name.
//!
//! ```rust
//! use serde_json::json;
//! use stooling::{HandlerModule, ToolArgs, ToolDefinition, ToolRegistry, ToolResult};
//!
//! let registry = ToolRegistry::new();
//! registry.install_handlers(
//!     "demo.text",
//!     HandlerModule::new().with_sync("echo", |args: &ToolArgs| {
//!         ToolResult::success(args["text"].clone())
//!     }),
//! );
//!
//! let definition = ToolDefinition::builder("echo", "Echo the input text", "demo.text.echo")
//!     .parameters(json!({
//!         "type": "object",
//!         "properties": {"text": {"type": "string"}},
//!         "required": ["text"]
//!     }))
//!     .build()
//!     .expect("definition should be valid");
//!
//! registry
//!     .register_from_definition(definition, false)
//!     .expect("echo should register");
//!
//! assert!(registry.has("echo"));
//! assert_eq!(registry.list(), vec!["echo".to_string()]);
//! assert!(registry.get_definition("echo").is_some());
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use globset::Glob;
use scommon::Registry;
use serde_json::Value;
use walkdir::WalkDir;

use crate::{
    AsyncFunctionTool, FunctionTool, HandlerModule, HandlerTable, Tool, ToolArgs, ToolDefinition,
    ToolError, ToolResult,
};

/// File-name glob used when a directory load does not name one.
pub const DEFAULT_DEFINITION_PATTERN: &str = "*.{yaml,yml}";

static INSTANCE: Mutex<Option<Arc<ToolRegistry>>> = Mutex::new(None);

#[derive(Default)]
struct RegistryState {
    tools: Registry<String, Tool>,
    definitions: Registry<String, Arc<ToolDefinition>>,
    handlers: HandlerTable,
}

impl RegistryState {
    fn insert(&mut self, tool: Tool, allow_override: bool) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        let replaced = self.tools.contains_key(&name);
        if replaced && !allow_override {
            return Err(ToolError::duplicate(name));
        }

        self.definitions.remove(&name);
        self.tools.insert(name.clone(), tool);
        if replaced {
            tracing::info!(event = "tool_replaced", tool = %name);
        } else {
            tracing::debug!(event = "tool_registered", tool = %name);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    state: RwLock<RegistryState>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that resolves handlers against `handlers`.
    pub fn with_handlers(handlers: HandlerTable) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                handlers,
                ..RegistryState::default()
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Process-wide registry, created empty on first use.
    pub fn get_instance() -> Arc<ToolRegistry> {
        let mut instance = INSTANCE.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(instance.get_or_insert_with(|| Arc::new(ToolRegistry::new())))
    }

    /// Drops the process-wide registry; the next `get_instance` builds a new one.
    pub fn reset_instance() {
        let mut instance = INSTANCE.lock().unwrap_or_else(PoisonError::into_inner);
        *instance = None;
    }

    /// Installs `registry` as the process-wide registry, returning the previous one.
    pub fn replace_instance(registry: Arc<ToolRegistry>) -> Option<Arc<ToolRegistry>> {
        let mut instance = INSTANCE.lock().unwrap_or_else(PoisonError::into_inner);
        instance.replace(registry)
    }

    pub fn register(&self, tool: Tool, allow_override: bool) -> Result<(), ToolError> {
        self.write().insert(tool, allow_override)
    }

    pub fn register_fn<F>(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handler: F,
    ) -> Result<(), ToolError>
    where
        F: Fn(&ToolArgs) -> ToolResult + Send + Sync + 'static,
    {
        self.register(
            Tool::from_sync(FunctionTool::new(name, description, parameters, handler)),
            false,
        )
    }

    pub fn register_async_fn<F, Fut>(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handler: F,
    ) -> Result<(), ToolError>
    where
        F: Fn(ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        self.register(
            Tool::from_async(AsyncFunctionTool::new(name, description, parameters, handler)),
            false,
        )
    }

    /// Resolves the definition's handler and registers the bound tool.
    ///
    /// Every failure, a duplicate name included, is reported as a
    /// `Registration` error carrying the tool name and handler path, with the
    /// underlying error as its cause.
    pub fn register_from_definition(
        &self,
        definition: ToolDefinition,
        allow_override: bool,
    ) -> Result<(), ToolError> {
        let name = definition.name().to_string();
        let handler = definition.handler().to_string();
        let definition = Arc::new(definition);

        let wrap = |cause: ToolError| {
            ToolError::registration(format!("failed to register tool '{name}'"))
                .with_tool_name(name.clone())
                .with_handler(handler.clone())
                .with_cause(cause)
        };

        let mut state = self.write();
        let tool = state.handlers.bind(Arc::clone(&definition)).map_err(wrap)?;
        state.insert(tool, allow_override).map_err(wrap)?;
        state.definitions.insert(name.clone(), definition);
        Ok(())
    }

    /// Registers the single YAML definition stored at `path`, returning its name.
    pub fn register_from_source(
        &self,
        path: impl AsRef<Path>,
        allow_override: bool,
    ) -> Result<String, ToolError> {
        let path = path.as_ref();
        let definition = ToolDefinition::from_yaml_file(path).map_err(|cause| {
            ToolError::registration("failed to load tool definition")
                .with_source_path(path)
                .with_cause(cause)
        })?;

        let name = definition.name().to_string();
        self.register_from_definition(definition, allow_override)
            .map_err(|error| error.with_source_path(path))?;

        tracing::debug!(event = "definition_loaded", tool = %name, path = %path.display());
        Ok(name)
    }

    /// Registers every matching definition file directly inside `dir`.
    ///
    /// Files are attempted in sorted order and successful registrations stay
    /// in place. When any file fails, the returned `Registration` error lists
    /// each failure in `failures` and the names that did land in `registered`.
    pub fn register_from_source_directory(
        &self,
        dir: impl AsRef<Path>,
        pattern: Option<&str>,
        allow_override: bool,
    ) -> Result<Vec<String>, ToolError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(
                ToolError::registration("definition directory does not exist or is not a directory")
                    .with_source_path(dir),
            );
        }

        let pattern = pattern.unwrap_or(DEFAULT_DEFINITION_PATTERN);
        let matcher = Glob::new(pattern)
            .map_err(|error| {
                ToolError::registration(format!("invalid definition file pattern '{pattern}': {error}"))
                    .with_source_path(dir)
            })?
            .compile_matcher();

        let mut registered = Vec::new();
        let mut failures = Vec::new();

        // Symlinked definitions are loaded; a dangling link lands in `failures`.
        let entries = WalkDir::new(dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    let failure = ToolError::registration(format!(
                        "failed to read definition directory entry: {error}"
                    ));
                    failures.push(match error.path() {
                        Some(path) => failure.with_source_path(path),
                        None => failure.with_source_path(dir),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() || !matcher.is_match(entry.file_name()) {
                continue;
            }

            match self.register_from_source(entry.path(), allow_override) {
                Ok(name) => registered.push(name),
                Err(error) => {
                    tracing::warn!(
                        event = "definition_failed",
                        path = %entry.path().display(),
                        error = %error
                    );
                    failures.push(error);
                }
            }
        }

        if failures.is_empty() {
            tracing::info!(
                event = "definitions_loaded",
                dir = %dir.display(),
                count = registered.len()
            );
            return Ok(registered);
        }

        Err(ToolError::registration(format!(
            "failed to register {} tool definition(s) from directory",
            failures.len()
        ))
        .with_source_path(dir)
        .with_failures(failures)
        .with_registered(registered))
    }

    pub fn get(&self, name: &str) -> Result<Tool, ToolError> {
        self.read()
            .tools
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::tool_not_found(name))
    }

    /// Definition the tool was registered from, if it came from one.
    pub fn get_definition(&self, name: &str) -> Option<Arc<ToolDefinition>> {
        self.read().definitions.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.read().tools.contains_key(name)
    }

    /// Registered tool names in ascending order.
    pub fn list(&self) -> Vec<String> {
        self.read().tools.keys().cloned().collect()
    }

    pub fn list_tools(&self) -> Vec<Tool> {
        self.read().tools.values().cloned().collect()
    }

    pub fn items(&self) -> Vec<(String, Tool)> {
        self.read()
            .tools
            .iter()
            .map(|(name, tool)| (name.clone(), tool.clone()))
            .collect()
    }

    pub fn unregister(&self, name: &str) -> Result<(), ToolError> {
        let mut state = self.write();
        state
            .tools
            .remove(name)
            .ok_or_else(|| ToolError::tool_not_found(name))?;
        state.definitions.remove(name);
        tracing::debug!(event = "tool_unregistered", tool = name);
        Ok(())
    }

    /// Removes every tool and definition record; installed handlers stay.
    pub fn clear(&self) {
        let mut state = self.write();
        let removed = state.tools.len();
        state.tools.clear();
        state.definitions.clear();
        tracing::debug!(event = "registry_cleared", removed);
    }

    pub fn len(&self) -> usize {
        self.read().tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().tools.is_empty()
    }

    pub fn install_handlers(&self, module_path: impl Into<String>, module: HandlerModule) {
        let module_path = module_path.into();
        tracing::debug!(event = "handlers_installed", module = %module_path, members = module.len());
        self.write().handlers.install(module_path, module);
    }

    pub fn handler_modules(&self) -> Vec<String> {
        self.read().handlers.module_paths()
    }

    /// Copies the named tools that exist into a fresh, independent registry
    /// sharing this registry's handler table.
    pub fn filtered<I, S>(&self, names: I) -> ToolRegistry
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let state = self.read();
        let mut scoped = RegistryState {
            handlers: state.handlers.clone(),
            ..RegistryState::default()
        };

        for name in names {
            let name = name.as_ref();
            let Some(tool) = state.tools.get(name) else {
                continue;
            };
            scoped.tools.insert(name.to_string(), tool.clone());
            if let Some(definition) = state.definitions.get(name) {
                scoped
                    .definitions
                    .insert(name.to_string(), Arc::clone(definition));
            }
        }

        ToolRegistry {
            state: RwLock::new(scoped),
        }
    }
}
