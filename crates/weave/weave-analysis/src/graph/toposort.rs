//! Topological ordering of providers for a target type set.

use weave_core::errors::GraphError;
use weave_core::types::collections::{FxHashMap, FxHashSet};

use super::types::Graph;
use crate::scanner::Provider;

#[derive(Default)]
struct SortState {
    visited: FxHashSet<String>,
    visiting: FxHashSet<String>,
    added: FxHashSet<usize>,
    order: Vec<usize>,
}

impl<'t> Graph<'t> {
    /// Providers in dependency order for the given target types.
    /// Targets are visited in the order supplied by the caller.
    pub fn topological_sort(&self, targets: &[String]) -> Result<Vec<&Provider>, GraphError> {
        self.topological_sort_with_extra_edges(targets, None)
    }

    /// Like [`Graph::topological_sort`], with additional synthetic
    /// dependency edges. `extra_edges` maps a provider's return type to
    /// dependency type strings that must be visited before it; used for
    /// auto-collected slice parameters whose item providers must precede
    /// the consumer.
    pub fn topological_sort_with_extra_edges(
        &self,
        targets: &[String],
        extra_edges: Option<&FxHashMap<String, Vec<String>>>,
    ) -> Result<Vec<&Provider>, GraphError> {
        let order = self.sort_indices(targets, extra_edges)?;
        Ok(order.into_iter().map(|idx| &self.providers[idx]).collect())
    }

    pub(crate) fn sort_indices(
        &self,
        targets: &[String],
        extra_edges: Option<&FxHashMap<String, Vec<String>>>,
    ) -> Result<Vec<usize>, GraphError> {
        let mut state = SortState::default();
        for target in targets {
            self.visit(target, extra_edges, &mut state)?;
        }
        Ok(state.order)
    }

    fn visit(
        &self,
        type_str: &str,
        extra_edges: Option<&FxHashMap<String, Vec<String>>>,
        state: &mut SortState,
    ) -> Result<(), GraphError> {
        let resolved = self.resolve_type(type_str);
        if state.visited.contains(&resolved) {
            return Ok(());
        }
        if state.visiting.contains(&resolved) {
            // Cannot happen after a clean verify_acyclic pass.
            return Err(GraphError::UnexpectedCycle { type_str: resolved });
        }
        state.visiting.insert(resolved.clone());

        let Some(&idx) = self.provider_map.get(&resolved) else {
            // Grouped, auto-collected, or external; nothing to emit.
            state.visiting.remove(&resolved);
            state.visited.insert(resolved);
            return Ok(());
        };

        for param in &self.providers[idx].params {
            let dep = self.resolve_type(&param.type_str);
            self.visit(&dep, extra_edges, state)?;
        }

        if let Some(extra) = extra_edges {
            for ret in &self.providers[idx].returns {
                if let Some(extras) = extra.get(&ret.type_str) {
                    for extra_dep in extras {
                        self.visit(extra_dep, extra_edges, state)?;
                    }
                }
            }
        }

        state.visiting.remove(&resolved);
        state.visited.insert(resolved);

        // A multi-return provider reached through several of its products
        // is emitted once.
        if state.added.insert(idx) {
            state.order.push(idx);
        }
        for ret in &self.providers[idx].returns {
            state.visited.insert(ret.type_str.clone());
        }

        Ok(())
    }
}
