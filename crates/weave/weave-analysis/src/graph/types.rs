//! Graph data model and read-only accessors.

use weave_core::errors::ProviderRef;
use weave_core::types::collections::FxHashMap;

use crate::model::{TypeId, TypeTable};
use crate::naming::group_field_name;
use crate::scanner::Provider;

/// The resolved dependency graph.
///
/// Providers are stored once and referenced by index; `provider_map` keys
/// are canonical type strings, which is the identity that survives across
/// loader universes.
pub struct Graph<'t> {
    pub(crate) table: &'t TypeTable,
    pub(crate) providers: Vec<Provider>,
    /// type_str → provider index; excludes grouped and invoke-only providers.
    pub(crate) provider_map: FxHashMap<String, usize>,
    /// interface type_str → concrete type_str.
    pub(crate) bindings: FxHashMap<String, String>,
    /// group name → member provider indices, in scan order.
    pub(crate) groups: FxHashMap<String, Vec<usize>>,
    /// type_str → container field identifier.
    pub(crate) type_to_field: FxHashMap<String, String>,

    // Auxiliary indices for short-name resolution.
    pub(crate) short_to_full: FxHashMap<String, String>,
    pub(crate) pkg_name_to_path: FxHashMap<String, String>,
    /// Module-wide interface catalogue from the scanner; the
    /// auto-collection fallback.
    pub(crate) iface_catalogue: FxHashMap<String, TypeId>,
    /// Group-path heuristic input retained from the config for
    /// short-name resolution.
    pub(crate) module: String,
    pub(crate) group_paths: Vec<String>,
}

impl<'t> Graph<'t> {
    /// All discovered providers, in scan order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// The provider registered for a type string, if any.
    pub fn provider_for(&self, type_str: &str) -> Option<&Provider> {
        self.provider_map
            .get(type_str)
            .map(|&idx| &self.providers[idx])
    }

    /// Interface → concrete bindings.
    pub fn bindings(&self) -> &FxHashMap<String, String> {
        &self.bindings
    }

    /// type_str → container field identifier.
    pub fn type_to_field(&self) -> &FxHashMap<String, String> {
        &self.type_to_field
    }

    /// Group names, lexically sorted.
    pub fn group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Members of a group, in scan order.
    pub fn group_providers(&self, name: &str) -> Vec<&Provider> {
        self.groups
            .get(name)
            .map(|members| members.iter().map(|&idx| &self.providers[idx]).collect())
            .unwrap_or_default()
    }

    /// Follow interface bindings to the concrete type.
    pub(crate) fn resolve_type(&self, type_str: &str) -> String {
        match self.bindings.get(type_str) {
            Some(concrete) => concrete.clone(),
            None => type_str.to_string(),
        }
    }

    /// The group whose derived field name matches, if any.
    /// Checked in lexical group order.
    pub(crate) fn field_name_to_group(&self, field_name: &str) -> Option<String> {
        let mut names: Vec<&String> = self.groups.keys().collect();
        names.sort_unstable();
        names
            .into_iter()
            .find(|name| group_field_name(name) == field_name)
            .cloned()
    }

    pub(crate) fn provider_ref(&self, idx: usize) -> ProviderRef {
        let p = &self.providers[idx];
        ProviderRef {
            pkg_name: p.pkg_name.clone(),
            func_name: p.func_name.clone(),
            position: p.position.clone(),
        }
    }
}
