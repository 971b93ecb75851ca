//! Observability hooks for tool execution.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sobserve::{CompositeToolHooks, MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks};
//! use stooling::ToolExecutor;
//!
//! let hooks = CompositeToolHooks::new()
//!     .with(SafeToolHooks::new(TracingObservabilityHooks))
//!     .with(SafeToolHooks::new(MetricsObservabilityHooks));
//! let _executor = ToolExecutor::new().with_hooks(Arc::new(hooks));
//! ```

mod composite_hooks;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use composite_hooks::CompositeToolHooks;
pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeToolHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        CompositeToolHooks, MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks,
    };
}
