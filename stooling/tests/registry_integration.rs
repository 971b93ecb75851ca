use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use stooling::{
    HandlerModule, HandlerTable, ToolArgs, ToolCall, ToolDefinition, ToolErrorKind, ToolExecutor,
    ToolOrchestrator, ToolRegistry, ToolResult, ToolStatus,
};
use tempfile::TempDir;

const ECHO_YAML: &str = r#"
name: echo
description: Echo the input text back
parameters:
  type: object
  properties:
    text:
      type: string
      description: Text to echo
  required: [text]
handler: demo.text.echo
timeout: 2
"#;

fn handlers() -> HandlerTable {
    HandlerTable::new().with_module(
        "demo.text",
        HandlerModule::new()
            .with_sync("echo", |args: &ToolArgs| {
                ToolResult::success(args.get("text").cloned().unwrap_or(Value::Null))
            })
            .with_async("slow_echo", |args: ToolArgs| async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                ToolResult::success(args.get("text").cloned().unwrap_or(Value::Null))
            }),
    )
}

fn write(dir: &Path, file_name: &str, contents: &str) {
    fs::write(dir.join(file_name), contents).expect("fixture should be written");
}

fn tool_yaml(name: &str, handler: &str) -> String {
    format!(
        "name: {name}\ndescription: Tool {name}\nparameters:\n  type: object\n  properties: {{}}\nhandler: {handler}\n"
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn echo_definition_round_trips_through_executor() {
    let registry = ToolRegistry::with_handlers(handlers());
    let definition = ToolDefinition::from_yaml_str(ECHO_YAML).expect("definition should parse");
    registry
        .register_from_definition(definition, false)
        .expect("echo should register");

    let tool = registry.get("echo").expect("echo should be registered");
    assert!(!tool.is_async());

    let mut args = ToolArgs::new();
    args.insert("text".to_string(), json!("hi"));
    let direct = tool
        .as_sync()
        .expect("sync capability")
        .execute(&args);
    assert_eq!(direct.status, ToolStatus::Success);
    assert_eq!(direct.data, "hi");

    let executed = ToolExecutor::new()
        .execute(&tool, args, registry.get_definition("echo").and_then(|d| d.timeout()))
        .await
        .expect("arguments are valid");
    assert_eq!(executed.data, "hi");
    assert_eq!(executed.metadata["tool_name"], "echo");
}

#[test]
fn nonexistent_handler_fails_registration_and_leaves_registry_unchanged() {
    let registry = ToolRegistry::with_handlers(handlers());
    let definition = ToolDefinition::builder("ghost", "Never registers", "missing.module.run")
        .build()
        .expect("definition is structurally valid");

    let error = registry
        .register_from_definition(definition, false)
        .expect_err("handler does not resolve");

    assert_eq!(error.kind, ToolErrorKind::Registration);
    assert!(error.to_string().contains("missing.module.run"));
    assert!(!registry.has("ghost"));
    assert!(registry.is_empty());
}

#[test]
fn register_from_source_reports_file_path_on_failure() {
    let dir = TempDir::new().expect("tempdir should be created");
    write(dir.path(), "echo.yaml", ECHO_YAML);
    write(dir.path(), "broken.yaml", "name: [unclosed");

    let registry = ToolRegistry::with_handlers(handlers());
    let name = registry
        .register_from_source(dir.path().join("echo.yaml"), false)
        .expect("echo should register");
    assert_eq!(name, "echo");
    assert_eq!(
        registry
            .get_definition("echo")
            .and_then(|definition| definition.timeout()),
        Some(Duration::from_secs(2))
    );

    let error = registry
        .register_from_source(dir.path().join("broken.yaml"), false)
        .expect_err("malformed yaml should fail");
    assert_eq!(error.kind, ToolErrorKind::Registration);
    assert!(
        error
            .source_path
            .as_deref()
            .is_some_and(|path| path.ends_with("broken.yaml"))
    );
    assert_eq!(error.root_cause().kind, ToolErrorKind::Validation);

    let missing = registry
        .register_from_source(dir.path().join("absent.yaml"), false)
        .expect_err("missing file should fail");
    assert_eq!(missing.kind, ToolErrorKind::Registration);

    let duplicate = registry
        .register_from_source(dir.path().join("echo.yaml"), false)
        .expect_err("second load is a duplicate");
    assert_eq!(duplicate.root_cause().kind, ToolErrorKind::DuplicateTool);
    assert_eq!(duplicate.tool_name.as_deref(), Some("echo"));
}

#[test]
fn directory_load_keeps_successes_and_aggregates_failures() {
    let dir = TempDir::new().expect("tempdir should be created");
    write(dir.path(), "a_alpha.yaml", &tool_yaml("alpha", "demo.text.echo"));
    write(dir.path(), "b_beta.yml", &tool_yaml("beta", "demo.text.echo"));
    write(dir.path(), "c_ghost.yaml", &tool_yaml("ghost", "missing.module.run"));
    write(dir.path(), "d_bad.yaml", "name: Bad Name\n");
    write(dir.path(), "e_gamma.yaml", &tool_yaml("gamma", "demo.text.echo"));
    write(dir.path(), "notes.txt", "not a definition");
    fs::create_dir(dir.path().join("nested")).expect("nested dir");
    write(
        &dir.path().join("nested"),
        "delta.yaml",
        &tool_yaml("delta", "demo.text.echo"),
    );

    let registry = ToolRegistry::with_handlers(handlers());
    let error = registry
        .register_from_source_directory(dir.path(), None, false)
        .expect_err("two files should fail");

    assert_eq!(error.kind, ToolErrorKind::Registration);
    assert_eq!(error.failures.len(), 2);
    assert!(
        error.failures[0]
            .source_path
            .as_deref()
            .is_some_and(|path| path.ends_with("c_ghost.yaml"))
    );
    assert!(
        error.failures[1]
            .source_path
            .as_deref()
            .is_some_and(|path| path.ends_with("d_bad.yaml"))
    );
    assert_eq!(error.registered, vec!["alpha", "beta", "gamma"]);
    assert_eq!(registry.list(), vec!["alpha", "beta", "gamma"]);
    assert!(!registry.has("delta"));
}

#[test]
fn directory_load_honours_pattern_and_rejects_missing_directory() {
    let dir = TempDir::new().expect("tempdir should be created");
    write(dir.path(), "alpha.tool.yaml", &tool_yaml("alpha", "demo.text.echo"));
    write(dir.path(), "beta.yaml", &tool_yaml("beta", "demo.text.echo"));

    let registry = ToolRegistry::with_handlers(handlers());
    let names = registry
        .register_from_source_directory(dir.path(), Some("*.tool.yaml"), false)
        .expect("matching file is valid");
    assert_eq!(names, vec!["alpha"]);
    assert!(!registry.has("beta"));

    let missing = registry
        .register_from_source_directory(dir.path().join("absent"), None, false)
        .expect_err("missing directory should fail");
    assert_eq!(missing.kind, ToolErrorKind::Registration);
    assert!(missing.failures.is_empty());
}

#[cfg(unix)]
#[test]
fn directory_load_follows_symlinked_definitions() {
    let sources = TempDir::new().expect("tempdir should be created");
    write(sources.path(), "echo.yaml", ECHO_YAML);

    let dir = TempDir::new().expect("tempdir should be created");
    std::os::unix::fs::symlink(sources.path().join("echo.yaml"), dir.path().join("linked.yaml"))
        .expect("symlink should be created");
    std::os::unix::fs::symlink(
        sources.path().join("absent.yaml"),
        dir.path().join("z_dangling.yaml"),
    )
    .expect("symlink should be created");

    let registry = ToolRegistry::with_handlers(handlers());
    let error = registry
        .register_from_source_directory(dir.path(), None, false)
        .expect_err("dangling link should be reported");

    assert_eq!(error.registered, vec!["echo"]);
    assert_eq!(registry.list(), vec!["echo"]);
    assert_eq!(error.failures.len(), 1);
    assert!(
        error.failures[0]
            .source_path
            .as_deref()
            .is_some_and(|path| path.ends_with("z_dangling.yaml"))
    );
}

#[tokio::test]
async fn orchestrator_applies_definition_timeout() {
    let dir = TempDir::new().expect("tempdir should be created");
    write(
        dir.path(),
        "slow.yaml",
        "name: slow_echo\ndescription: Echo slowly\nparameters:\n  type: object\n  properties:\n    text: {type: string}\nhandler: demo.text.slow_echo\ntimeout: 0.05\nasync: true\n",
    );

    let registry = Arc::new(ToolRegistry::with_handlers(handlers()));
    registry
        .register_from_source(dir.path().join("slow.yaml"), false)
        .expect("slow echo should register");
    assert!(registry.get("slow_echo").expect("registered").is_async());

    let orchestrator = ToolOrchestrator::new(Arc::clone(&registry));
    let mut input = ToolArgs::new();
    input.insert("text".to_string(), json!("late"));
    let result = orchestrator
        .execute_single_tool_call(&ToolCall::new("toolu_1", "slow_echo", input))
        .await;

    assert!(result.is_error);
    assert!(result.content.contains("exceeded timeout of 0.05s"));
}
