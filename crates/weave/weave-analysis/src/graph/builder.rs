//! Graph construction: group classification, singleton registration,
//! and three-source binding resolution.

use tracing::debug;
use weave_core::config::WeaveConfig;
use weave_core::errors::GraphError;
use weave_core::types::collections::{BTreeMap, FxHashMap};

use crate::annotations::{annotation_values, AnnotationKind};
use crate::commands::DiscoveredCommand;
use crate::model::{TypeId, TypeTable};
use crate::naming::{field_name, to_short_type_name};
use crate::scanner::Provider;

use super::types::Graph;

impl<'t> Graph<'t> {
    /// Construct the dependency graph from discovered providers.
    ///
    /// `pkg_index` and `iface_catalogue` come from the scanner. Duplicate
    /// providers and duplicate bindings are collected; any error fails the
    /// build with the full list. Unresolvable interfaces are left for
    /// per-entry validation.
    pub fn build(
        table: &'t TypeTable,
        mut providers: Vec<Provider>,
        cfg: &WeaveConfig,
        pkg_index: FxHashMap<String, String>,
        iface_catalogue: FxHashMap<String, TypeId>,
    ) -> Result<Self, Vec<GraphError>> {
        // Phase A: classify providers into groups by path prefix.
        for p in &mut providers {
            let rel = p.rel_path(&cfg.module).to_string();
            for (group_name, group_cfg) in &cfg.groups {
                if group_cfg.paths.iter().any(|gp| rel.starts_with(gp.as_str())) {
                    p.groups.push(group_name.clone());
                }
            }
        }

        let (short_to_full, pkg_name_to_path) = build_type_index(&providers, pkg_index);

        let group_paths = cfg
            .groups
            .values()
            .flat_map(|g| g.paths.iter().cloned())
            .collect();

        let mut graph = Graph {
            table,
            providers,
            provider_map: FxHashMap::default(),
            bindings: FxHashMap::default(),
            groups: FxHashMap::default(),
            type_to_field: FxHashMap::default(),
            short_to_full,
            pkg_name_to_path,
            iface_catalogue,
            module: cfg.module.clone(),
            group_paths,
        };

        let mut errs = Vec::new();
        graph.register_providers(&mut errs);
        graph.resolve_bindings(cfg, &mut errs);

        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(graph)
    }

    /// Phase B: register each non-grouped, non-invoke provider's products,
    /// reporting conflicts; grouped providers join their groups in scan
    /// order.
    fn register_providers(&mut self, errs: &mut Vec<GraphError>) {
        for idx in 0..self.providers.len() {
            if self.providers[idx].is_invoke {
                continue;
            }
            if !self.providers[idx].groups.is_empty() {
                continue;
            }

            for ri in 0..self.providers[idx].returns.len() {
                let type_str = self.providers[idx].returns[ri].type_str.clone();
                if let Some(&existing) = self.provider_map.get(&type_str) {
                    errs.push(GraphError::DuplicateProvider {
                        type_str,
                        first: self.provider_ref(existing),
                        second: self.provider_ref(idx),
                    });
                    continue;
                }
                self.type_to_field
                    .insert(type_str.clone(), field_name(&type_str));
                self.provider_map.insert(type_str, idx);
            }
        }

        for idx in 0..self.providers.len() {
            for group in self.providers[idx].groups.clone() {
                self.groups.entry(group).or_default().push(idx);
            }
        }
    }

    /// Phase C: interface → concrete mappings from three sources, each
    /// later source respecting earlier ones.
    fn resolve_bindings(&mut self, cfg: &WeaveConfig, errs: &mut Vec<GraphError>) {
        // C1: explicit config bindings, short names promoted to canonical.
        for (concrete_short, ifaces) in &cfg.bindings {
            let concrete_full = self.resolve_config_type(concrete_short);
            for iface_short in ifaces {
                let iface_full = self.resolve_config_type(iface_short);
                if self.bindings.contains_key(&iface_full) {
                    errs.push(GraphError::DuplicateBinding { iface: iface_full });
                    continue;
                }
                debug!(iface = %iface_full, concrete = %concrete_full, "config binding");
                self.bindings
                    .insert(iface_full.clone(), concrete_full.clone());
                if let Some(&idx) = self.provider_map.get(&concrete_full) {
                    self.provider_map.insert(iface_full.clone(), idx);
                    self.type_to_field
                        .insert(iface_full.clone(), field_name(&iface_full));
                }
            }
        }

        // C2: annotation bindings; config wins on conflict.
        for idx in 0..self.providers.len() {
            let targets: Vec<String> =
                annotation_values(&self.providers[idx].annotations, AnnotationKind::Bind)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
            for target in targets {
                if self.bindings.contains_key(&target) {
                    continue;
                }
                let Some(first_ret) = self.providers[idx].returns.first() else {
                    continue;
                };
                let concrete = first_ret.type_str.clone();
                debug!(iface = %target, concrete = %concrete, "annotation binding");
                self.bindings.insert(target.clone(), concrete);
                self.provider_map.insert(target, idx);
            }
        }

        // C3: auto-detect unique implementers for unbound interface params.
        self.auto_detect_bindings();
    }

    /// For every parameter that is an interface and neither bound nor
    /// directly provided, bind it iff exactly one registered provider has a
    /// return satisfying it (as value or pointer-of-value). Zero or many
    /// candidates fall through to validation.
    fn auto_detect_bindings(&mut self) {
        let mut needed: BTreeMap<String, TypeId> = BTreeMap::new();
        for p in &self.providers {
            for param in &p.params {
                if param.is_iface
                    && !self.bindings.contains_key(&param.type_str)
                    && !self.provider_map.contains_key(&param.type_str)
                {
                    needed.insert(param.type_str.clone(), param.type_id);
                }
            }
        }

        for (iface_str, iface_ty) in needed {
            let Some(iface_id) = self.table.interface_id(iface_ty) else {
                continue;
            };

            let mut keys: Vec<String> = self.provider_map.keys().cloned().collect();
            keys.sort_unstable();

            let mut candidates: Vec<(String, usize)> = Vec::new();
            for key in keys {
                let idx = self.provider_map[&key];
                for ret in &self.providers[idx].returns {
                    if self.table.implements(ret.type_id, iface_id)
                        || self.table.pointer_implements(ret.type_id, iface_id)
                    {
                        candidates.push((key.clone(), idx));
                        break;
                    }
                }
            }

            if candidates.len() == 1 {
                let (concrete, idx) = candidates.remove(0);
                debug!(iface = %iface_str, concrete = %concrete, "auto binding");
                self.bindings.insert(iface_str.clone(), concrete);
                self.provider_map.insert(iface_str, idx);
            }
        }
    }

    /// Deferred binding pass for command parameters.
    ///
    /// Command packages load in their own universe, so their interface
    /// identity is matched by canonical string against a provider-universe
    /// type map rather than by handle. The last mutation before queries.
    pub fn bind_command_interfaces(&mut self, commands: &[DiscoveredCommand]) {
        let mut provider_types: FxHashMap<String, TypeId> = FxHashMap::default();
        for p in &self.providers {
            for type_ref in p.params.iter().chain(p.returns.iter()) {
                provider_types.insert(type_ref.type_str.clone(), type_ref.type_id);
            }
        }

        for cmd in commands {
            for param in &cmd.params {
                if !param.is_iface || self.bindings.contains_key(&param.type_str) {
                    continue;
                }
                let Some(&ty) = provider_types.get(&param.type_str) else {
                    continue;
                };
                let Some(iface_id) = self.table.interface_id(ty) else {
                    continue;
                };

                let mut candidates: Vec<String> = Vec::new();
                for p in &self.providers {
                    for ret in &p.returns {
                        if self.table.implements(ret.type_id, iface_id) {
                            candidates.push(ret.type_str.clone());
                            break;
                        }
                    }
                }

                if candidates.len() == 1 {
                    let concrete = candidates.remove(0);
                    debug!(
                        command = %cmd.name,
                        iface = %param.type_str,
                        concrete = %to_short_type_name(&concrete),
                        "command interface binding"
                    );
                    if let Some(&idx) = self.provider_map.get(&concrete) {
                        self.provider_map.insert(param.type_str.clone(), idx);
                    }
                    self.bindings.insert(param.type_str.clone(), concrete);
                }
            }
        }
    }
}

/// Build lookup maps from all discovered types: short type form → full
/// form, and package short name → package path.
fn build_type_index(
    providers: &[Provider],
    pkg_index: FxHashMap<String, String>,
) -> (FxHashMap<String, String>, FxHashMap<String, String>) {
    let mut short_to_full = FxHashMap::default();
    let mut pkg_name_to_path = pkg_index;

    for p in providers {
        pkg_name_to_path.insert(p.pkg_name.clone(), p.pkg_path.clone());

        for type_ref in p.returns.iter().chain(p.params.iter()) {
            let short = to_short_type_name(&type_ref.type_str);
            if short != type_ref.type_str {
                short_to_full.insert(short, type_ref.type_str.clone());
            }
            if !type_ref.pkg_path.is_empty() {
                if let Some(last) = type_ref.pkg_path.rsplit('/').next() {
                    pkg_name_to_path.insert(last.to_string(), type_ref.pkg_path.clone());
                }
            }
        }
    }

    (short_to_full, pkg_name_to_path)
}
