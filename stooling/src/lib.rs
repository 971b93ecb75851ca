//! Tool definitions, a thread-safe tool registry, and the execution layer on top of it.

mod args;
mod definition;
mod error;
mod executor;
mod formatter;
mod handlers;
mod hooks;
mod orchestrator;
mod registry;
mod result;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        ExecutionContext, ExecutorConfig, HandlerModule, HandlerTable, Tool, ToolArgs, ToolCall,
        ToolCallResult, ToolDefinition, ToolError, ToolErrorKind, ToolExecutionHooks,
        ToolExecutor, ToolOrchestrator, ToolRegistry, ToolResult, ToolStatus,
    };
}

pub use args::{
    optional_bool, optional_f64, optional_string, optional_u64, parse_json_object,
    parse_json_value, required_string,
};
pub use definition::{ParameterSchema, ToolDefinition, ToolDefinitionBuilder};
pub use error::{ToolError, ToolErrorKind};
pub use executor::{ExecutorConfig, ToolExecutor, validate_arguments};
pub use formatter::{format_tools_for_anthropic, tool_descriptions};
pub use handlers::{HandlerEntry, HandlerModule, HandlerTable};
pub use hooks::{NoopToolExecutionHooks, ToolExecutionHooks};
pub use orchestrator::ToolOrchestrator;
pub use registry::{DEFAULT_DEFINITION_PATTERN, ToolRegistry};
pub use result::{ToolResult, ToolStatus};
pub use tool::{
    AsyncFunctionTool, AsyncHandlerTool, AsyncTool, FunctionTool, HandlerTool, SyncTool, Tool,
    ToolArgs, ToolDescriptor, ToolFuture,
};
pub use types::{ExecutionContext, ToolCall, ToolCallResult};
