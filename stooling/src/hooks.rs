//! Lifecycle hooks for tool execution.
//!
//! ```rust
//! use stooling::{NoopToolExecutionHooks, ToolExecutionHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn ToolExecutionHooks) {}
//!
//! let hooks = NoopToolExecutionHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use crate::{ExecutionContext, ToolError, ToolResult};

pub trait ToolExecutionHooks: Send + Sync {
    fn on_execution_start(&self, _tool_name: &str, _context: &ExecutionContext) {}

    fn on_execution_success(
        &self,
        _tool_name: &str,
        _context: &ExecutionContext,
        _result: &ToolResult,
        _elapsed: Duration,
    ) {
    }

    /// Called for non-success results and for calls rejected before running.
    fn on_execution_failure(
        &self,
        _tool_name: &str,
        _context: &ExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToolExecutionHooks;

impl ToolExecutionHooks for NoopToolExecutionHooks {}
