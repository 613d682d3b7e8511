//! Discovered command model.

use serde::{Deserialize, Serialize};

use crate::scanner::TypeRef;

/// A command package discovered under the command subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredCommand {
    /// Command-tree-relative directory, `/` folded to `_`.
    pub name: String,
    pub pkg_path: String,
    pub pkg_name: String,
    /// The named type the constructor returns a pointer to.
    pub struct_name: String,
    pub func_name: String,
    /// Constructor parameters; the command's dependency needs.
    pub params: Vec<TypeRef>,
    /// Exported handler methods, sorted by name.
    pub handlers: Vec<HandlerInfo>,
    /// Has a `Handle` method: a leaf command with no subcommands.
    pub is_single: bool,
}

impl DiscoveredCommand {
    pub fn has_deps(&self) -> bool {
        !self.params.is_empty()
    }
}

/// An exported handler method on a command struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerInfo {
    pub method_name: String,
}

impl HandlerInfo {
    /// Subcommand name for this handler.
    pub fn command_name(&self) -> String {
        pascal_to_kebab(&self.method_name)
    }
}

/// `Create` → `create`, `UpdatePassword` → `update-password`.
pub fn pascal_to_kebab(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            out.push('-');
        }
        out.extend(c.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_splits_on_every_uppercase_boundary() {
        assert_eq!(pascal_to_kebab("Create"), "create");
        assert_eq!(pascal_to_kebab("UpdatePassword"), "update-password");
        assert_eq!(pascal_to_kebab("CleanSuspended"), "clean-suspended");
        assert_eq!(pascal_to_kebab("list"), "list");
    }
}
