//! Command constructor detection.
//!
//! A command package exposes an exported `New*` constructor returning a
//! pointer to a named type that carries a `Command() *cobra.Command` method
//! plus at least one handler method `fn(*cobra.Command) -> error`. A
//! `Handle` handler marks the command as a leaf; any other handlers become
//! subcommands.

use tracing::debug;
use weave_core::config::WeaveConfig;
use weave_core::errors::CommandError;

use crate::model::{FuncDecl, LoadedPackage, TypeId, TypeTable};
use crate::scanner::TypeRef;

use super::types::{DiscoveredCommand, HandlerInfo};

/// Import path of the CLI library's command type in the target ecosystem.
const COMMAND_TYPE_PKG: &str = "github.com/spf13/cobra";
const COMMAND_TYPE_NAME: &str = "Command";

/// Discovers commands in the packages of the command subtree.
pub struct CommandDetector<'a> {
    cfg: &'a WeaveConfig,
}

impl<'a> CommandDetector<'a> {
    pub fn new(cfg: &'a WeaveConfig) -> Self {
        Self { cfg }
    }

    /// Analyze the command packages and return discovered commands sorted
    /// by name. The bare command-root package is skipped.
    pub fn detect(
        &self,
        table: &TypeTable,
        packages: &[LoadedPackage],
    ) -> Result<Vec<DiscoveredCommand>, CommandError> {
        let load_errors: Vec<String> = packages
            .iter()
            .flat_map(|p| p.errors.iter().cloned())
            .collect();
        if !load_errors.is_empty() {
            return Err(CommandError::PackageErrors {
                errors: load_errors,
            });
        }

        let mut commands = Vec::new();
        for pkg in packages {
            let rel = pkg
                .pkg_path
                .strip_prefix(&self.cfg.module)
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(&pkg.pkg_path);
            if rel == "cmd" {
                continue;
            }

            if let Some(cmd) = analyze_package(table, pkg, rel) {
                debug!(command = %cmd.name, constructor = %cmd.func_name, "discovered command");
                commands.push(cmd);
            }
        }

        commands.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(commands)
    }
}

/// Find the first matching constructor in one command package,
/// scanning candidates in lexical order.
fn analyze_package(
    table: &TypeTable,
    pkg: &LoadedPackage,
    rel_path: &str,
) -> Option<DiscoveredCommand> {
    let mut funcs: Vec<&FuncDecl> = pkg.funcs.iter().collect();
    funcs.sort_by(|a, b| a.name.cmp(&b.name));

    for func in funcs {
        if !func.name.starts_with("New") || !is_exported(&func.name) {
            continue;
        }

        // Must return exactly one pointer-to-named type.
        if func.results.len() != 1 {
            continue;
        }
        let Some(named) = table.as_pointer(func.results[0]) else {
            continue;
        };
        let Some((_, struct_name)) = table.named_info(named) else {
            continue;
        };

        if !has_command_method(table, named) {
            continue;
        }

        let (handlers, is_single) = find_handler_methods(table, named);
        if handlers.is_empty() {
            continue;
        }

        let params = func
            .params
            .iter()
            .map(|&p| TypeRef::from_type(table, p))
            .collect();

        let dir_name = rel_path
            .strip_prefix("cmd/")
            .unwrap_or(rel_path)
            .replace('/', "_");

        return Some(DiscoveredCommand {
            name: dir_name,
            pkg_path: pkg.pkg_path.clone(),
            pkg_name: pkg.name.clone(),
            struct_name: struct_name.to_string(),
            func_name: func.name.clone(),
            params,
            handlers,
            is_single,
        });
    }

    None
}

/// Whether `*T` has a zero-argument `Command` method returning the CLI
/// library's command pointer.
fn has_command_method(table: &TypeTable, named: TypeId) -> bool {
    table.pointer_method_set(named).iter().any(|m| {
        m.name == "Command"
            && m.params.is_empty()
            && m.results.len() == 1
            && is_cli_command_ptr(table, m.results[0])
    })
}

/// Collect exported handler methods `fn(*cobra.Command) -> error` on `*T`.
/// Returns the handlers sorted by name and whether a `Handle` method makes
/// this a leaf command.
fn find_handler_methods(table: &TypeTable, named: TypeId) -> (Vec<HandlerInfo>, bool) {
    let mut handlers = Vec::new();
    let mut is_single = false;

    for m in table.pointer_method_set(named) {
        if m.name == "Command" || !is_exported(&m.name) {
            continue;
        }
        if m.params.len() != 1 || m.results.len() != 1 {
            continue;
        }
        if !is_cli_command_ptr(table, m.params[0]) {
            continue;
        }
        if !table.is_error(m.results[0]) {
            continue;
        }

        if m.name == "Handle" {
            is_single = true;
        }
        handlers.push(HandlerInfo {
            method_name: m.name.clone(),
        });
    }

    handlers.sort_by(|a, b| a.method_name.cmp(&b.method_name));
    (handlers, is_single)
}

fn is_cli_command_ptr(table: &TypeTable, id: TypeId) -> bool {
    let Some(elem) = table.as_pointer(id) else {
        return false;
    };
    matches!(
        table.named_info(elem),
        Some((pkg, name)) if pkg == COMMAND_TYPE_PKG && name == COMMAND_TYPE_NAME
    )
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}
