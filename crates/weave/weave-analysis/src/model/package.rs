//! Loaded package descriptions supplied by the external loader.

use serde::{Deserialize, Serialize};
use weave_core::types::source::Position;

use super::types::TypeId;

/// An import edge of a loaded package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageImport {
    pub name: String,
    pub pkg_path: String,
}

/// A top-level function declaration with its resolved signature.
///
/// Methods never appear here; receiver-bound functions live in the type
/// table's method sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    /// Doc comment lines, leading `//` optional.
    pub doc: Vec<String>,
    pub params: Vec<TypeId>,
    pub results: Vec<TypeId>,
    pub position: Position,
}

impl FuncDecl {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            doc: Vec::new(),
            params: Vec::new(),
            results: Vec::new(),
            position,
        }
    }
}

/// One package as the loader resolved it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedPackage {
    /// Canonical import path.
    pub pkg_path: String,
    /// Short package name.
    pub name: String,
    /// Top-level function declarations.
    pub funcs: Vec<FuncDecl>,
    /// Exported named types declared in this package.
    pub decl_types: Vec<TypeId>,
    /// Resolved imports, used to extend the package index.
    pub imports: Vec<PackageImport>,
    /// Loader diagnostics; any entry makes the package set unusable.
    pub errors: Vec<String>,
}

impl LoadedPackage {
    pub fn new(pkg_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pkg_path: pkg_path.into(),
            name: name.into(),
            funcs: Vec::new(),
            decl_types: Vec::new(),
            imports: Vec::new(),
            errors: Vec::new(),
        }
    }
}
