//! Explicit lookup table from dotted handler paths to callables.
//!
//! Definitions name their handler as `module.path.member`. Instead of
//! reflective namespace traversal, handler crates install [`HandlerModule`]s
//! under a module path at startup and the registry resolves against them.
//!
//! ```rust
//! use serde_json::json;
//! use stooling::{HandlerModule, HandlerTable, ToolArgs, ToolResult};
//!
//! let mut table = HandlerTable::new();
//! table.install(
//!     "demo.text",
//!     HandlerModule::new()
//!         .with_sync("echo", |args: &ToolArgs| ToolResult::success(args["text"].clone()))
//!         .with_constant("VERSION", json!("1.0")),
//! );
//!
//! assert!(table.resolve("demo.text.echo").is_ok());
//! assert!(table.resolve("demo.text.VERSION").is_ok());
//! assert!(table.resolve("demo.missing.echo").is_err());
//! ```

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use scommon::Registry;
use serde_json::Value;

use crate::tool::{AsyncHandlerFn, SyncHandlerFn};
use crate::{
    AsyncHandlerTool, HandlerTool, Tool, ToolArgs, ToolDefinition, ToolError, ToolFuture, ToolResult,
};

/// A named member exported by a handler module.
#[derive(Clone)]
pub enum HandlerEntry {
    Sync(Arc<SyncHandlerFn>),
    Async(Arc<AsyncHandlerFn>),
    /// A non-invocable export; resolving a definition to it fails.
    Constant(Value),
}

impl HandlerEntry {
    pub fn sync<F>(handler: F) -> Self
    where
        F: Fn(&ToolArgs) -> ToolResult + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(handler))
    }

    pub fn asynchronous<F, Fut>(handler: F) -> Self
    where
        F: Fn(ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        Self::Async(Arc::new(
            move |args: ToolArgs| -> ToolFuture<'static, ToolResult> { Box::pin(handler(args)) },
        ))
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    pub fn is_callable(&self) -> bool {
        !matches!(self, Self::Constant(_))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Sync(_) => "sync",
            Self::Async(_) => "async",
            Self::Constant(_) => "constant",
        }
    }
}

impl Debug for HandlerEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HandlerModule {
    members: Registry<String, HandlerEntry>,
}

impl HandlerModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sync<F>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ToolArgs) -> ToolResult + Send + Sync + 'static,
    {
        self.with_entry(name, HandlerEntry::sync(handler))
    }

    pub fn with_async<F, Fut>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        self.with_entry(name, HandlerEntry::asynchronous(handler))
    }

    pub fn with_constant(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_entry(name, HandlerEntry::constant(value))
    }

    pub fn with_entry(mut self, name: impl Into<String>, entry: HandlerEntry) -> Self {
        self.insert(name, entry);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: HandlerEntry) -> Option<HandlerEntry> {
        self.members.insert(name.into(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&HandlerEntry> {
        self.members.get(name)
    }

    pub fn member_names(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    /// Copies every member of `other` into this module; later members win.
    pub fn merge(&mut self, other: HandlerModule) {
        for (name, entry) in other.members.iter() {
            self.members.insert(name.clone(), entry.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HandlerTable {
    modules: Registry<String, HandlerModule>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module_path: impl Into<String>, module: HandlerModule) -> Self {
        self.install(module_path, module);
        self
    }

    /// Adds a module, merging members into an existing module at the same path.
    pub fn install(&mut self, module_path: impl Into<String>, module: HandlerModule) {
        let module_path = module_path.into();
        match self.modules.get_mut(&module_path) {
            Some(existing) => existing.merge(module),
            None => {
                self.modules.insert(module_path, module);
            }
        }
    }

    pub fn module_paths(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    pub fn module(&self, module_path: &str) -> Option<&HandlerModule> {
        self.modules.get(module_path)
    }

    /// Looks up the member a dotted handler path names, invocable or not.
    pub fn resolve(&self, handler_path: &str) -> Result<&HandlerEntry, ToolError> {
        let (module_path, member) = handler_path.rsplit_once('.').ok_or_else(|| {
            ToolError::validation(format!(
                "handler '{handler_path}' must be a dotted path of the form module.member"
            ))
            .with_handler(handler_path)
        })?;

        let module = self.modules.get(module_path).ok_or_else(|| {
            ToolError::not_found(format!("module '{module_path}' not found"))
                .with_handler(handler_path)
        })?;

        module.get(member).ok_or_else(|| {
            ToolError::not_found(format!(
                "member '{member}' not found in module '{module_path}'"
            ))
            .with_handler(handler_path)
        })
    }

    /// Resolves the definition's handler and wraps it into a tool exposing
    /// the capability `definition.is_async()` asks for.
    pub fn bind(&self, definition: Arc<ToolDefinition>) -> Result<Tool, ToolError> {
        let handler_path = definition.handler();
        let entry = self.resolve(handler_path)?;

        match (entry, definition.is_async()) {
            (HandlerEntry::Sync(handler), false) => Ok(Tool::from_sync(HandlerTool::new(
                Arc::clone(&definition),
                Arc::clone(handler),
            ))),
            (HandlerEntry::Async(handler), true) => Ok(Tool::from_async(AsyncHandlerTool::new(
                Arc::clone(&definition),
                Arc::clone(handler),
            ))),
            (HandlerEntry::Constant(_), _) => Err(ToolError::validation(format!(
                "handler '{handler_path}' is not callable"
            ))
            .with_handler(handler_path)),
            (entry, wants_async) => {
                let expected = if wants_async { "async" } else { "sync" };
                Err(ToolError::validation(format!(
                    "handler '{handler_path}' is not callable as {expected}; it is a {} handler",
                    entry.kind()
                ))
                .with_handler(handler_path))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToolErrorKind;

    fn table() -> HandlerTable {
        HandlerTable::new().with_module(
            "demo.text",
            HandlerModule::new()
                .with_sync("echo", |args: &ToolArgs| {
                    ToolResult::success(args.get("text").cloned().unwrap_or_default())
                })
                .with_async("shout", |args: ToolArgs| async move {
                    let text = args
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_uppercase();
                    ToolResult::success(text)
                })
                .with_constant("VERSION", "1.0"),
        )
    }

    fn definition(handler: &str, is_async: bool) -> Arc<ToolDefinition> {
        Arc::new(
            ToolDefinition::builder("probe", "Probe tool", handler)
                .asynchronous(is_async)
                .build()
                .expect("definition should be valid"),
        )
    }

    #[test]
    fn install_merges_members_into_existing_module() {
        let mut table = table();
        table.install(
            "demo.text",
            HandlerModule::new().with_sync("reverse", |_args: &ToolArgs| {
                ToolResult::success_empty()
            }),
        );

        assert_eq!(table.module_paths(), vec!["demo.text".to_string()]);
        assert_eq!(
            table.module("demo.text").map(HandlerModule::member_names),
            Some(vec![
                "VERSION".to_string(),
                "echo".to_string(),
                "reverse".to_string(),
                "shout".to_string(),
            ])
        );
    }

    #[test]
    fn bind_wraps_sync_and_async_handlers() {
        let table = table();

        let sync_tool = table
            .bind(definition("demo.text.echo", false))
            .expect("sync handler should bind");
        assert!(!sync_tool.is_async());
        assert_eq!(sync_tool.name(), "probe");

        let async_tool = table
            .bind(definition("demo.text.shout", true))
            .expect("async handler should bind");
        assert!(async_tool.is_async());
    }

    #[test]
    fn missing_module_and_member_are_not_found() {
        let table = table();

        let missing_module = table
            .bind(definition("demo.nothing.echo", false))
            .expect_err("unknown module should fail");
        assert_eq!(missing_module.kind, ToolErrorKind::NotFound);
        assert!(missing_module.message.contains("module 'demo.nothing' not found"));

        let missing_member = table
            .bind(definition("demo.text.whisper", false))
            .expect_err("unknown member should fail");
        assert_eq!(missing_member.kind, ToolErrorKind::NotFound);
        assert_eq!(missing_member.handler.as_deref(), Some("demo.text.whisper"));
    }

    #[test]
    fn constants_and_mode_mismatches_are_not_callable() {
        let table = table();

        let constant = table
            .bind(definition("demo.text.VERSION", false))
            .expect_err("constant should not bind");
        assert_eq!(constant.kind, ToolErrorKind::Validation);
        assert!(constant.message.contains("not callable"));

        let mismatch = table
            .bind(definition("demo.text.echo", true))
            .expect_err("sync handler should not bind as async");
        assert_eq!(mismatch.kind, ToolErrorKind::Validation);
        assert!(mismatch.message.contains("not callable as async"));

        assert_eq!(
            format!("{:?}", table.resolve("demo.text.VERSION").expect("constant resolves")),
            format!("Constant({:?})", json!("1.0"))
        );
    }
}
