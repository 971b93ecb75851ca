//! Metrics-based observability hooks for tool execution.
//!
//! ```rust
//! use sobserve::MetricsObservabilityHooks;
//! use stooling::ToolExecutionHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolExecutionHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use stooling::{ExecutionContext, ToolError, ToolExecutionHooks, ToolResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ToolExecutionHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_name: &str, _context: &ExecutionContext) {
        metrics::counter!(
            "sisyphus_tool_execution_start_total",
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        tool_name: &str,
        _context: &ExecutionContext,
        _result: &ToolResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "sisyphus_tool_execution_success_total",
            "tool_name" => tool_name.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "sisyphus_tool_execution_duration_seconds",
            "tool_name" => tool_name.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_name: &str,
        _context: &ExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "sisyphus_tool_execution_failure_total",
            "tool_name" => tool_name.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "sisyphus_tool_execution_duration_seconds",
            "tool_name" => tool_name.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}
