//! Runs tools with argument validation, timeouts, and panic capture.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use serde_json::json;
//! use stooling::{ExecutorConfig, FunctionTool, Tool, ToolArgs, ToolExecutor, ToolResult};
//!
//! # tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap().block_on(async {
//! let executor = ToolExecutor::with_config(
//!     ExecutorConfig::default().with_default_timeout(Duration::from_secs(5)),
//! );
//! let tool = Tool::from_sync(FunctionTool::new(
//!     "echo",
//!     "Echo the input text",
//!     json!({"type": "object", "properties": {"text": {"type": "string"}}, "required": ["text"]}),
//!     |args: &ToolArgs| ToolResult::success(args["text"].clone()),
//! ));
//!
//! let mut args = ToolArgs::new();
//! args.insert("text".to_string(), json!("hi"));
//! let result = executor.execute(&tool, args, None).await.expect("arguments are valid");
//! assert_eq!(result.data, "hi");
//! assert_eq!(result.metadata["tool_name"], "echo");
//!
//! let rejected = executor.execute(&tool, ToolArgs::new(), None).await;
//! assert!(rejected.is_err());
//! # });
//! ```

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use jsonschema::JSONSchema;
use serde_json::Value;

use crate::{
    ExecutionContext, NoopToolExecutionHooks, Tool, ToolArgs, ToolError, ToolExecutionHooks,
    ToolResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Budget applied when a call does not name its own timeout.
    pub default_timeout: Duration,
    pub validate_parameters: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(60),
            validate_parameters: true,
        }
    }
}

impl ExecutorConfig {
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_validate_parameters(mut self, validate: bool) -> Self {
        self.validate_parameters = validate;
        self
    }
}

#[derive(Clone)]
pub struct ToolExecutor {
    config: ExecutorConfig,
    hooks: Arc<dyn ToolExecutionHooks>,
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::with_config(ExecutorConfig::default())
    }
}

impl ToolExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExecutorConfig) -> Self {
        Self {
            config,
            hooks: Arc::new(NoopToolExecutionHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolExecutionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub async fn execute(
        &self,
        tool: &Tool,
        args: ToolArgs,
        timeout: Option<Duration>,
    ) -> Result<ToolResult, ToolError> {
        self.execute_with_context(tool, args, timeout, &ExecutionContext::default())
            .await
    }

    /// Validates `args`, then runs the tool under the effective timeout.
    ///
    /// Only rejected arguments surface as `Err`; timeouts and panics come
    /// back as non-success results. A timed-out sync tool keeps running on
    /// the blocking pool since it cannot be interrupted.
    pub async fn execute_with_context(
        &self,
        tool: &Tool,
        args: ToolArgs,
        timeout: Option<Duration>,
        context: &ExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        let name = tool.name().to_string();
        let started = Instant::now();
        self.hooks.on_execution_start(&name, context);

        if self.config.validate_parameters
            && let Err(error) = validate_arguments(tool, &args)
        {
            self.hooks
                .on_execution_failure(&name, context, &error, started.elapsed());
            return Err(error);
        }

        let budget = timeout.unwrap_or(self.config.default_timeout);
        let result = match tool {
            Tool::Sync(sync_tool) => {
                let sync_tool = Arc::clone(sync_tool);
                let handle = tokio::task::spawn_blocking(move || sync_tool.execute(&args));
                match tokio::time::timeout(budget, handle).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(join_error)) if join_error.is_panic() => {
                        panicked(&name, join_error.into_panic())
                    }
                    Ok(Err(join_error)) => {
                        ToolResult::cancelled(format!("Tool '{name}' was cancelled: {join_error}"))
                    }
                    Err(_) => timed_out(&name, budget, started.elapsed()),
                }
            }
            Tool::Async(async_tool) => {
                let future = AssertUnwindSafe(async_tool.execute_async(args)).catch_unwind();
                match tokio::time::timeout(budget, future).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(payload)) => panicked(&name, payload),
                    Err(_) => timed_out(&name, budget, started.elapsed()),
                }
            }
        };

        let elapsed = started.elapsed();
        let result = result
            .with_metadata("execution_time", elapsed.as_secs_f64())
            .with_metadata("tool_name", name.clone());

        match result.to_error() {
            None => self
                .hooks
                .on_execution_success(&name, context, &result, elapsed),
            Some(error) => {
                let error = error.with_tool_name(name.clone());
                self.hooks
                    .on_execution_failure(&name, context, &error, elapsed);
            }
        }

        Ok(result)
    }
}

/// Checks `args` against the tool's JSON Schema.
pub fn validate_arguments(tool: &Tool, args: &ToolArgs) -> Result<(), ToolError> {
    let name = tool.name();
    let schema = JSONSchema::compile(tool.parameters()).map_err(|error| {
        ToolError::validation(format!("tool '{name}' has an invalid parameter schema: {error}"))
            .with_tool_name(name)
    })?;

    let instance = Value::Object(args.clone());
    let messages = match schema.validate(&instance) {
        Ok(()) => return Ok(()),
        Err(errors) => errors
            .map(|error| {
                let path = error.instance_path.to_string();
                let path = if path.is_empty() { "root".to_string() } else { path };
                format!("at {path}: {error}")
            })
            .collect::<Vec<_>>(),
    };

    Err(ToolError::invalid_arguments(format!(
        "parameter validation failed for tool '{name}' {}",
        messages.join("; ")
    ))
    .with_tool_name(name))
}

fn timed_out(name: &str, budget: Duration, elapsed: Duration) -> ToolResult {
    ToolResult::timeout(format!(
        "Tool '{name}' execution exceeded timeout of {}s (ran for {:.2}s)",
        budget.as_secs_f64(),
        elapsed.as_secs_f64()
    ))
}

fn panicked(name: &str, payload: Box<dyn Any + Send>) -> ToolResult {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    ToolResult::error(format!("Tool '{name}' execution failed: panic: {detail}"))
        .with_metadata("exception_type", "panic")
}
