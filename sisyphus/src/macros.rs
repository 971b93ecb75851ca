/// Builds a [`ToolArgs`](crate::ToolArgs) map from `key => value` pairs.
///
/// Each value is any serializable expression; nest `json!` for objects.
///
/// ```rust
/// use sisyphus::tool_args;
///
/// let args = tool_args! {
///     "pattern" => "TODO",
///     "max_results" => 5,
///     "case_sensitive" => false,
/// };
/// assert_eq!(args["max_results"], 5);
/// ```
#[macro_export]
macro_rules! tool_args {
    () => {
        $crate::ToolArgs::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::ToolArgs::new();
        $(
            args.insert(::std::string::String::from($key), $crate::util::json_value!($value));
        )+
        args
    }};
}

/// Creates a [`ToolCall`](crate::ToolCall) with an inline argument map.
///
/// ```rust
/// use sisyphus::tool_call;
///
/// let call = tool_call!("toolu_1", "read_file", { "file_path" => "README.md" });
/// assert_eq!(call.name, "read_file");
/// assert_eq!(call.input["file_path"], "README.md");
/// ```
#[macro_export]
macro_rules! tool_call {
    ($id:expr, $name:expr $(,)?) => {
        $crate::ToolCall::new($id, $name, $crate::ToolArgs::new())
    };
    ($id:expr, $name:expr, { $($body:tt)* } $(,)?) => {
        $crate::ToolCall::new($id, $name, $crate::tool_args! { $($body)* })
    };
}

/// Wraps a closure into a synchronous [`Tool`](crate::Tool).
///
/// The parameter schema defaults to an open object when omitted.
///
/// ```rust
/// use sisyphus::{ToolResult, fn_tool};
///
/// let tool = fn_tool!("ping", "Replies with pong", |_args| ToolResult::success("pong"));
/// assert_eq!(tool.name(), "ping");
/// assert!(!tool.is_async());
/// ```
#[macro_export]
macro_rules! fn_tool {
    ($name:expr, $description:expr, $handler:expr $(,)?) => {
        $crate::fn_tool!(
            $name,
            $description,
            $crate::util::json_value!({ "type": "object", "properties": {} }),
            $handler
        )
    };
    ($name:expr, $description:expr, $parameters:expr, $handler:expr $(,)?) => {
        $crate::Tool::from_sync($crate::FunctionTool::new(
            $name,
            $description,
            $parameters,
            $handler,
        ))
    };
}
