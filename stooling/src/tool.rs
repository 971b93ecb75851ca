//! Tool capability traits and the handle the registry hands out.
//!
//! A tool exposes exactly one execution capability: [`SyncTool::execute`] or
//! [`AsyncTool::execute_async`]. [`Tool`] wraps either one so callers can pick
//! the right call path by inspection instead of by trial.
//!
//! ```rust
//! use serde_json::json;
//! use stooling::{FunctionTool, Tool, ToolArgs, ToolResult};
//!
//! let tool = Tool::from_sync(FunctionTool::new(
//!     "echo",
//!     "Echoes the text argument",
//!     json!({"type": "object", "properties": {"text": {"type": "string"}}}),
//!     |args: &ToolArgs| ToolResult::success(args["text"].clone()),
//! ));
//!
//! assert_eq!(tool.name(), "echo");
//! assert!(!tool.is_async());
//!
//! let mut args = ToolArgs::new();
//! args.insert("text".to_string(), json!("hi"));
//! let result = tool.as_sync().expect("sync capability").execute(&args);
//! assert_eq!(result.data, "hi");
//! ```

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use scommon::BoxFuture;
use serde_json::{Map, Value};

use crate::{ToolDefinition, ToolResult};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

/// Keyword-style arguments, keyed by `parameters.properties` field name.
pub type ToolArgs = Map<String, Value>;

pub trait ToolDescriptor: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema object describing the accepted arguments.
    fn parameters(&self) -> &Value;
}

pub trait SyncTool: ToolDescriptor {
    fn execute(&self, args: &ToolArgs) -> ToolResult;
}

pub trait AsyncTool: ToolDescriptor {
    fn execute_async<'a>(&'a self, args: ToolArgs) -> ToolFuture<'a, ToolResult>;
}

#[derive(Clone)]
pub enum Tool {
    Sync(Arc<dyn SyncTool>),
    Async(Arc<dyn AsyncTool>),
}

impl Tool {
    pub fn from_sync<T>(tool: T) -> Self
    where
        T: SyncTool + 'static,
    {
        Self::Sync(Arc::new(tool))
    }

    pub fn from_async<T>(tool: T) -> Self
    where
        T: AsyncTool + 'static,
    {
        Self::Async(Arc::new(tool))
    }

    fn descriptor(&self) -> &dyn ToolDescriptor {
        match self {
            Self::Sync(tool) => tool.as_ref(),
            Self::Async(tool) => tool.as_ref(),
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor().name()
    }

    pub fn description(&self) -> &str {
        self.descriptor().description()
    }

    pub fn parameters(&self) -> &Value {
        self.descriptor().parameters()
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    pub fn as_sync(&self) -> Option<&Arc<dyn SyncTool>> {
        match self {
            Self::Sync(tool) => Some(tool),
            Self::Async(_) => None,
        }
    }

    pub fn as_async(&self) -> Option<&Arc<dyn AsyncTool>> {
        match self {
            Self::Async(tool) => Some(tool),
            Self::Sync(_) => None,
        }
    }

    /// True when both handles point at the same tool instance.
    pub fn same_instance(&self, other: &Tool) -> bool {
        match (self, other) {
            (Self::Sync(left), Self::Sync(right)) => {
                std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
            }
            (Self::Async(left), Self::Async(right)) => {
                std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
            }
            _ => false,
        }
    }
}

impl Debug for Tool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name())
            .field("async", &self.is_async())
            .finish()
    }
}

pub(crate) type SyncHandlerFn = dyn Fn(&ToolArgs) -> ToolResult + Send + Sync;
pub(crate) type AsyncHandlerFn =
    dyn Fn(ToolArgs) -> ToolFuture<'static, ToolResult> + Send + Sync;

/// Hand-built synchronous tool backed by a closure.
pub struct FunctionTool {
    name: String,
    description: String,
    parameters: Value,
    handler: Arc<SyncHandlerFn>,
}

impl FunctionTool {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handler: F,
    ) -> Self
    where
        F: Fn(&ToolArgs) -> ToolResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(handler),
        }
    }
}

impl ToolDescriptor for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &Value {
        &self.parameters
    }
}

impl SyncTool for FunctionTool {
    fn execute(&self, args: &ToolArgs) -> ToolResult {
        (self.handler)(args)
    }
}

/// Hand-built asynchronous tool backed by a closure returning a future.
pub struct AsyncFunctionTool {
    name: String,
    description: String,
    parameters: Value,
    handler: Arc<AsyncHandlerFn>,
}

impl AsyncFunctionTool {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        let handler: Arc<AsyncHandlerFn> =
            Arc::new(move |args: ToolArgs| -> ToolFuture<'static, ToolResult> {
                Box::pin(handler(args))
            });

        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler,
        }
    }
}

impl ToolDescriptor for AsyncFunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &Value {
        &self.parameters
    }
}

impl AsyncTool for AsyncFunctionTool {
    fn execute_async<'a>(&'a self, args: ToolArgs) -> ToolFuture<'a, ToolResult> {
        (self.handler)(args)
    }
}

/// Synchronous tool produced by binding a definition to its resolved handler.
pub struct HandlerTool {
    definition: Arc<ToolDefinition>,
    handler: Arc<SyncHandlerFn>,
}

impl HandlerTool {
    pub(crate) fn new(definition: Arc<ToolDefinition>, handler: Arc<SyncHandlerFn>) -> Self {
        Self {
            definition,
            handler,
        }
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }
}

impl ToolDescriptor for HandlerTool {
    fn name(&self) -> &str {
        self.definition.name()
    }

    fn description(&self) -> &str {
        self.definition.description()
    }

    fn parameters(&self) -> &Value {
        self.definition.parameters().as_value()
    }
}

impl SyncTool for HandlerTool {
    fn execute(&self, args: &ToolArgs) -> ToolResult {
        (self.handler)(args)
    }
}

/// Asynchronous counterpart of [`HandlerTool`].
pub struct AsyncHandlerTool {
    definition: Arc<ToolDefinition>,
    handler: Arc<AsyncHandlerFn>,
}

impl AsyncHandlerTool {
    pub(crate) fn new(definition: Arc<ToolDefinition>, handler: Arc<AsyncHandlerFn>) -> Self {
        Self {
            definition,
            handler,
        }
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }
}

impl ToolDescriptor for AsyncHandlerTool {
    fn name(&self) -> &str {
        self.definition.name()
    }

    fn description(&self) -> &str {
        self.definition.description()
    }

    fn parameters(&self) -> &Value {
        self.definition.parameters().as_value()
    }
}

impl AsyncTool for AsyncHandlerTool {
    fn execute_async<'a>(&'a self, args: ToolArgs) -> ToolFuture<'a, ToolResult> {
        (self.handler)(args)
    }
}
