//! Provider and type-reference models produced by the scanner.

use serde::{Deserialize, Serialize};
use weave_core::types::collections::{FxHashMap, SmallVec4};
use weave_core::types::source::Position;

use crate::annotations::Annotation;
use crate::model::{TypeId, TypeTable};

/// A single type occurrence in a provider's signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRef {
    /// Typed handle, used solely for interface and method-set queries.
    pub type_id: TypeId,
    /// Canonical fully-qualified rendering; identity key in the graph.
    pub type_str: String,
    /// Owning package path; empty for built-ins.
    pub pkg_path: String,
    /// Interface after one pointer indirection, excluding `error`.
    pub is_iface: bool,
    /// Consumer declared this dependency non-fatal if unprovided.
    pub optional: bool,
}

impl TypeRef {
    pub fn from_type(table: &TypeTable, type_id: TypeId) -> Self {
        Self {
            type_id,
            type_str: table.qualified(type_id),
            pkg_path: table.pkg_path(type_id).to_string(),
            is_iface: table.is_interface(type_id),
            optional: false,
        }
    }
}

/// A discovered constructor function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub func_name: String,
    pub pkg_path: String,
    pub pkg_name: String,
    /// Dependencies, in declaration order.
    pub params: SmallVec4<TypeRef>,
    /// Products, in declaration order; a trailing `error` is stripped.
    pub returns: SmallVec4<TypeRef>,
    /// The constructor had a trailing `error` return.
    pub has_error: bool,
    /// Executed for side effect only; products are not registered.
    pub is_invoke: bool,
    pub annotations: Vec<Annotation>,
    pub position: Position,
    /// Group memberships, resolved during graph building.
    pub groups: Vec<String>,
}

impl Provider {
    /// The package path relative to the module root.
    pub fn rel_path<'a>(&'a self, module: &str) -> &'a str {
        self.pkg_path
            .strip_prefix(module)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.pkg_path)
    }
}

/// Result of a provider scan.
#[derive(Debug)]
pub struct ScanOutput {
    pub providers: Vec<Provider>,
    /// Package short name → path, for every loaded package and its imports.
    pub pkg_index: FxHashMap<String, String>,
    /// Canonical string → handle for every exported interface type in the
    /// loaded module; the auto-collection fallback catalogue.
    pub iface_catalogue: FxHashMap<String, TypeId>,
}
