//! Built-in tools: file reading and writing, regex search, and command execution.
//!
//! Handlers are exposed as [`HandlerModule`]s under the `sisyphus.tools.*`
//! module paths, and the crate ships the YAML definitions that name them.
//!
//! ```rust
//! use stooling::ToolRegistry;
//!
//! let registry = ToolRegistry::new();
//! sbuiltins::install(&registry);
//! let names = sbuiltins::register_definitions(&registry, false)
//!     .expect("built-in definitions should register");
//!
//! assert_eq!(names, vec!["read_file", "search", "terminal", "write_file"]);
//! assert!(registry.get("terminal").expect("terminal is registered").is_async());
//! ```

pub mod filesystem;
pub mod search;
pub mod terminal;

use stooling::{HandlerModule, HandlerTable, ToolDefinition, ToolError, ToolRegistry};

/// Embedded definition sources, keyed by file name.
pub const DEFINITION_SOURCES: [(&str, &str); 4] = [
    ("read_file.yaml", include_str!("../definitions/read_file.yaml")),
    ("search.yaml", include_str!("../definitions/search.yaml")),
    ("terminal.yaml", include_str!("../definitions/terminal.yaml")),
    ("write_file.yaml", include_str!("../definitions/write_file.yaml")),
];

pub fn modules() -> Vec<(&'static str, HandlerModule)> {
    vec![
        (filesystem::MODULE_PATH, filesystem::module()),
        (search::MODULE_PATH, search::module()),
        (terminal::MODULE_PATH, terminal::module()),
    ]
}

pub fn handler_table() -> HandlerTable {
    modules()
        .into_iter()
        .fold(HandlerTable::new(), |table, (path, module)| {
            table.with_module(path, module)
        })
}

/// Installs the built-in handler modules into `registry`.
pub fn install(registry: &ToolRegistry) {
    for (path, module) in modules() {
        registry.install_handlers(path, module);
    }
}

pub fn definitions() -> Result<Vec<ToolDefinition>, ToolError> {
    DEFINITION_SOURCES
        .iter()
        .map(|(file_name, source)| {
            ToolDefinition::from_yaml_str(source).map_err(|error| error.with_source_path(file_name))
        })
        .collect()
}

/// Registers every built-in definition; handlers must already be installed.
pub fn register_definitions(
    registry: &ToolRegistry,
    allow_override: bool,
) -> Result<Vec<String>, ToolError> {
    let mut names = Vec::with_capacity(DEFINITION_SOURCES.len());
    for definition in definitions()? {
        let name = definition.name().to_string();
        registry.register_from_definition(definition, allow_override)?;
        names.push(name);
    }
    tracing::debug!(event = "builtins_registered", count = names.len());
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_definition_resolves_against_the_builtin_table() {
        let table = handler_table();
        for definition in definitions().expect("embedded definitions are valid") {
            assert!(
                table.resolve(definition.handler()).is_ok(),
                "{} should resolve",
                definition.handler()
            );
        }
    }

    #[test]
    fn registering_twice_requires_override() {
        let registry = ToolRegistry::with_handlers(handler_table());
        register_definitions(&registry, false).expect("first registration");

        let error = register_definitions(&registry, false).expect_err("duplicates");
        assert_eq!(error.root_cause().kind, stooling::ToolErrorKind::DuplicateTool);

        register_definitions(&registry, true).expect("override replaces tools");
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry
                .get_definition("read_file")
                .and_then(|definition| definition.metadata().get("category").cloned()),
            Some(serde_json::json!("filesystem"))
        );
    }
}
