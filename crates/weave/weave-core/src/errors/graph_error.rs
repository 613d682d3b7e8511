//! Graph construction and verification errors.
//!
//! These are user-facing: every variant names the providers involved with
//! their source positions, and carries a remediation hint where one exists.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::source::Position;

/// Identity of a provider as reported in error messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRef {
    pub pkg_name: String,
    pub func_name: String,
    pub position: Position,
}

impl fmt::Display for ProviderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.pkg_name, self.func_name, self.position)
    }
}

/// Errors surfaced while building or verifying the dependency graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Two non-grouped providers register the same product type.
    #[error(
        "type {type_str} has multiple providers:\n  1. {first}\n  2. {second}\n  hint: mark one of them with //weave:ignore"
    )]
    DuplicateProvider {
        type_str: String,
        first: ProviderRef,
        second: ProviderRef,
    },

    /// The same interface is bound by more than one configuration entry.
    #[error("interface {iface} has duplicate binding configuration")]
    DuplicateBinding { iface: String },

    /// A directed cycle in the resolved provider graph.
    #[error(
        "dependency cycle detected:\n  {}\nproviders involved:\n{}",
        .chain.join(" \u{2192} "),
        indent_providers(.providers)
    )]
    Cycle {
        /// Type strings along the cycle, first repeated last.
        chain: Vec<String>,
        /// Distinct providers on the cycle, in chain order.
        providers: Vec<ProviderRef>,
    },

    /// A required parameter resolves to a type no provider supplies.
    #[error("entry {entry:?}: {pkg_name}.{func_name} is missing dependency {missing}")]
    MissingDependency {
        entry: String,
        pkg_name: String,
        func_name: String,
        /// Short form of the unresolvable type.
        missing: String,
    },

    /// A cycle surfaced during topological sort. This cannot happen after a
    /// clean `verify_acyclic` pass unless the graph changed in between.
    #[error("unexpected cycle at {type_str}")]
    UnexpectedCycle { type_str: String },
}

fn indent_providers(providers: &[ProviderRef]) -> String {
    providers
        .iter()
        .map(|p| format!("  {p}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(pkg: &str, func: &str, line: u32) -> ProviderRef {
        ProviderRef {
            pkg_name: pkg.to_string(),
            func_name: func.to_string(),
            position: Position::new(format!("{pkg}/{pkg}.go"), line, 1),
        }
    }

    #[test]
    fn duplicate_provider_message_names_both_positions() {
        let err = GraphError::DuplicateProvider {
            type_str: "*example.com/app/cache.Client".to_string(),
            first: provider("cache", "NewClient", 10),
            second: provider("cache", "NewCache", 42),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache.NewClient (cache/cache.go:10:1)"), "{msg}");
        assert!(msg.contains("cache.NewCache (cache/cache.go:42:1)"), "{msg}");
        assert!(msg.contains("//weave:ignore"), "{msg}");
    }

    #[test]
    fn cycle_message_joins_chain_with_arrows() {
        let err = GraphError::Cycle {
            chain: vec!["A".into(), "B".into(), "A".into()],
            providers: vec![provider("a", "NewA", 1), provider("b", "NewB", 2)],
        };
        let msg = err.to_string();
        assert!(msg.contains("A \u{2192} B \u{2192} A"), "{msg}");
        assert!(msg.contains("  a.NewA"), "{msg}");
        assert!(msg.contains("  b.NewB"), "{msg}");
    }
}
