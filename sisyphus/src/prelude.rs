//! Common imports for most sisyphus applications.

pub use crate::{RuntimeBundle, RuntimeConfig, build_runtime, default_hooks};
// `tool_call` brings in both the helper function and the macro.
pub use crate::{execution_context, tool_call};
pub use crate::{fn_tool, tool_args};
pub use crate::{
    ExecutionContext, ExecutorConfig, HandlerModule, HandlerTable, Tool, ToolArgs, ToolCall,
    ToolCallResult, ToolDefinition, ToolError, ToolErrorKind, ToolExecutionHooks, ToolExecutor,
    ToolOrchestrator, ToolRegistry, ToolResult, ToolStatus, format_tools_for_anthropic,
};
