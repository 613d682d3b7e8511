//! Graph queries consumed by the emitter: full ordering, entry expansion,
//! slice auto-collection, and per-entry validation.

use weave_core::errors::GraphError;
use weave_core::types::collections::{FxHashMap, FxHashSet};

use crate::naming::to_short_type_name;
use crate::scanner::Provider;

use super::types::Graph;

impl<'t> Graph<'t> {
    /// All registered providers in dependency order; the full container
    /// field set.
    pub fn all_singleton_providers(&self) -> Result<Vec<&Provider>, GraphError> {
        let mut targets: Vec<String> = self.provider_map.keys().cloned().collect();
        targets.sort_unstable();
        self.topological_sort(&targets)
    }

    /// Providers needed for an entry point given the container field names
    /// it accesses, in dependency order, including satisfied invoke-only
    /// providers.
    ///
    /// A group field contributes the parameter types of every group member;
    /// a singleton field contributes its own type.
    pub fn entry_providers(&self, field_names: &[String]) -> Result<Vec<&Provider>, GraphError> {
        let mut field_to_type: FxHashMap<&str, &str> = FxHashMap::default();
        for (type_str, field) in &self.type_to_field {
            field_to_type.insert(field.as_str(), type_str.as_str());
        }

        let mut needed: FxHashSet<String> = FxHashSet::default();
        for field in field_names {
            if let Some(group) = self.field_name_to_group(field) {
                for &idx in &self.groups[&group] {
                    for param in &self.providers[idx].params {
                        needed.insert(param.type_str.clone());
                    }
                }
                continue;
            }

            if let Some(&type_str) = field_to_type.get(field.as_str()) {
                needed.insert(type_str.to_string());
            }
        }

        self.expand_and_sort(&needed, None)
    }

    /// Providers needed to construct the given types, in dependency order,
    /// including satisfied invoke-only providers. Used for command wiring
    /// traced from constructor parameter types.
    pub fn providers_for_types(&self, types: &[String]) -> Result<Vec<&Provider>, GraphError> {
        let needed: FxHashSet<String> = types.iter().cloned().collect();
        self.expand_and_sort(&needed, None)
    }

    /// Like [`Graph::providers_for_types`], with synthetic dependency edges
    /// for the topological sort.
    pub fn providers_for_types_with_extra_edges(
        &self,
        types: &[String],
        extra_edges: &FxHashMap<String, Vec<String>>,
    ) -> Result<Vec<&Provider>, GraphError> {
        let needed: FxHashSet<String> = types.iter().cloned().collect();
        self.expand_and_sort(&needed, Some(extra_edges))
    }

    /// Check that every provider in an entry's ordered set has its
    /// non-optional dependencies satisfied. A `[]X` parameter passes when
    /// `auto_collect(X)` yields at least one provider.
    pub fn validate_entry(&self, name: &str, providers: &[&Provider]) -> Vec<GraphError> {
        let mut provided: FxHashSet<String> = FxHashSet::default();
        for p in providers {
            for ret in &p.returns {
                provided.insert(ret.type_str.clone());
            }
        }
        for (iface, concrete) in &self.bindings {
            if provided.contains(concrete) {
                provided.insert(iface.clone());
            }
        }

        let mut errs = Vec::new();
        for p in providers {
            for param in &p.params {
                if param.optional {
                    continue;
                }
                let resolved = self.resolve_type(&param.type_str);
                if provided.contains(&resolved) {
                    continue;
                }

                if let Some(elem) = param.type_str.strip_prefix("[]") {
                    if !self.auto_collect(elem).is_empty() {
                        continue;
                    }
                }

                errs.push(GraphError::MissingDependency {
                    entry: name.to_string(),
                    pkg_name: p.pkg_name.clone(),
                    func_name: p.func_name.clone(),
                    missing: to_short_type_name(&param.type_str),
                });
            }
        }
        errs
    }

    /// All non-invoke providers whose return type satisfies the given
    /// interface element type, sorted by package path. Used to synthesize
    /// a slice parameter when no explicit group is configured.
    pub fn auto_collect(&self, elem_type_str: &str) -> Vec<&Provider> {
        let Some(iface_id) = self.find_iface_type(elem_type_str) else {
            return Vec::new();
        };

        let mut matches: Vec<usize> = Vec::new();
        for (idx, p) in self.providers.iter().enumerate() {
            if p.is_invoke {
                continue;
            }
            for ret in &p.returns {
                let satisfied = self.table.implements(ret.type_id, iface_id)
                    || (self.table.as_pointer(ret.type_id).is_none()
                        && self.table.pointer_implements(ret.type_id, iface_id));
                if satisfied {
                    matches.push(idx);
                    break;
                }
            }
        }

        matches.sort_by(|&a, &b| self.providers[a].pkg_path.cmp(&self.providers[b].pkg_path));
        matches.into_iter().map(|idx| &self.providers[idx]).collect()
    }

    /// Find the interface handle for a type string: provider parameters
    /// first (including slice-element positions), then returns, then the
    /// module-wide catalogue.
    fn find_iface_type(&self, type_str: &str) -> Option<crate::model::TypeId> {
        for p in &self.providers {
            for param in &p.params {
                if param.type_str == type_str && param.is_iface {
                    if let Some(id) = self.table.interface_id(param.type_id) {
                        return Some(id);
                    }
                }
                if let Some(elem_str) = param.type_str.strip_prefix("[]") {
                    if elem_str == type_str {
                        if let Some(elem) = self.table.slice_elem(param.type_id) {
                            if let Some(id) = self.table.interface_id(elem) {
                                return Some(id);
                            }
                        }
                    }
                }
            }
            for ret in &p.returns {
                if ret.type_str == type_str && ret.is_iface {
                    if let Some(id) = self.table.interface_id(ret.type_id) {
                        return Some(id);
                    }
                }
            }
        }

        self.iface_catalogue
            .get(type_str)
            .and_then(|&ty| self.table.interface_id(ty))
    }

    /// Transitive expansion, invoke promotion to a fixed point, then a
    /// deterministic topological sort with satisfied invokes appended in
    /// promotion order.
    fn expand_and_sort(
        &self,
        needed: &FxHashSet<String>,
        extra_edges: Option<&FxHashMap<String, Vec<String>>>,
    ) -> Result<Vec<&Provider>, GraphError> {
        let mut expanded: FxHashSet<String> = FxHashSet::default();
        let mut seeds: Vec<&String> = needed.iter().collect();
        seeds.sort_unstable();
        for seed in seeds {
            self.expand_into(seed, &mut expanded);
        }

        let promoted = self.promote_invokes(&mut expanded);

        let mut targets: Vec<String> = expanded.into_iter().collect();
        targets.sort_unstable();

        let mut order = self.sort_indices(&targets, extra_edges)?;
        for idx in promoted {
            // An invoke provider can already be present through a bind
            // annotation that put it into the provider map.
            if !order.contains(&idx) {
                order.push(idx);
            }
        }

        Ok(order.into_iter().map(|idx| &self.providers[idx]).collect())
    }

    fn expand_into(&self, type_str: &str, expanded: &mut FxHashSet<String>) {
        let resolved = self.resolve_type(type_str);
        if !expanded.insert(resolved.clone()) {
            return;
        }
        if let Some(&idx) = self.provider_map.get(&resolved) {
            for param in &self.providers[idx].params {
                self.expand_into(&param.type_str, expanded);
            }
        }
    }

    /// Promote invoke-only providers whose parameters all resolve into the
    /// expanded set, iterating to a fixed point so invoke products can
    /// satisfy later invokes. Returns promotion order, which respects
    /// invoke-to-invoke dependencies.
    fn promote_invokes(&self, expanded: &mut FxHashSet<String>) -> Vec<usize> {
        let mut promoted = Vec::new();
        let mut done: FxHashSet<usize> = FxHashSet::default();

        loop {
            let mut changed = false;
            for (idx, p) in self.providers.iter().enumerate() {
                if !p.is_invoke || done.contains(&idx) {
                    continue;
                }
                let satisfied = p
                    .params
                    .iter()
                    .all(|param| expanded.contains(&self.resolve_type(&param.type_str)));
                if !satisfied {
                    continue;
                }

                done.insert(idx);
                promoted.push(idx);
                changed = true;
                for ret in &p.returns {
                    expanded.insert(ret.type_str.clone());
                }
            }
            if !changed {
                break;
            }
        }

        promoted
    }
}
