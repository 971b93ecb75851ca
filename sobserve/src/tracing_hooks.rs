//! Tracing-based observability hooks for tool execution.
//!
//! ```rust
//! use sobserve::TracingObservabilityHooks;
//! use stooling::ToolExecutionHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolExecutionHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use stooling::{ExecutionContext, ToolError, ToolExecutionHooks, ToolResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ToolExecutionHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_name: &str, context: &ExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name,
            call_id = context.call_id.as_deref(),
            trace_id = context.trace_id.as_ref().map(|id| id.as_str())
        );
    }

    fn on_execution_success(
        &self,
        tool_name: &str,
        context: &ExecutionContext,
        result: &ToolResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name,
            call_id = context.call_id.as_deref(),
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            status = ?result.status,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_name: &str,
        context: &ExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            tool_name,
            call_id = context.call_id.as_deref(),
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            user_error = error.is_user_error(),
            error = %error
        );
    }
}
