//! Cycle detection over the resolved provider graph.

use weave_core::errors::{GraphError, ProviderRef};
use weave_core::types::collections::FxHashSet;

use super::types::Graph;

impl<'t> Graph<'t> {
    /// Check for circular dependencies with a trail-tracking DFS.
    ///
    /// Every discovered cycle is reported; the scan never aborts early.
    /// Roots are visited in lexical order so the report is stable.
    pub fn verify_acyclic(&self) -> Vec<GraphError> {
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut errs = Vec::new();

        let mut roots: Vec<String> = self.provider_map.keys().cloned().collect();
        roots.sort_unstable();

        for root in roots {
            if visited.contains(&root) {
                continue;
            }

            let mut stack: Vec<(String, Vec<String>)> = vec![(root.clone(), vec![root])];

            while let Some((curr, trail)) = stack.pop() {
                if visited.contains(&curr) {
                    continue;
                }

                if let Some(&idx) = self.provider_map.get(&curr) {
                    for param in &self.providers[idx].params {
                        let dep = self.resolve_type(&param.type_str);

                        if let Some(i) = trail.iter().position(|t| *t == dep) {
                            let mut chain: Vec<String> = trail[i..].to_vec();
                            chain.push(dep.clone());
                            let providers = self.cycle_providers(&chain);
                            errs.push(GraphError::Cycle { chain, providers });
                        }

                        if self.provider_map.contains_key(&dep) && !visited.contains(&dep) {
                            let mut next_trail = trail.clone();
                            next_trail.push(dep.clone());
                            stack.push((dep, next_trail));
                        }
                    }
                }

                visited.insert(curr);
            }
        }

        errs
    }

    /// Distinct providers on a cycle, in chain order.
    fn cycle_providers(&self, chain: &[String]) -> Vec<ProviderRef> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut refs = Vec::new();
        for type_str in chain {
            if !seen.insert(type_str) {
                continue;
            }
            if let Some(&idx) = self.provider_map.get(type_str) {
                refs.push(self.provider_ref(idx));
            }
        }
        refs
    }
}
