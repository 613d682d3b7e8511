//! Provider extraction from loaded packages.

use tracing::debug;
use weave_core::config::WeaveConfig;
use weave_core::errors::ScanError;
use weave_core::types::collections::{FxHashMap, FxHashSet, SmallVec4};

use crate::annotations::{
    annotation_values, has_annotation, parse_annotations, Annotation, AnnotationKind,
};
use crate::model::{FuncDecl, LoadedPackage, TypeId, TypeTable};

use super::filter::PathFilter;
use super::types::{Provider, ScanOutput, TypeRef};

/// Discovers providers in a loaded package set.
pub struct Scanner<'a> {
    cfg: &'a WeaveConfig,
    filter: &'a dyn PathFilter,
}

impl<'a> Scanner<'a> {
    pub fn new(cfg: &'a WeaveConfig, filter: &'a dyn PathFilter) -> Self {
        Self { cfg, filter }
    }

    /// Extract providers from `packages`, along with the package index and
    /// the module-wide interface catalogue.
    ///
    /// Aborts with every loader diagnostic if any package failed to load.
    pub fn scan(
        &self,
        table: &TypeTable,
        packages: &[LoadedPackage],
    ) -> Result<ScanOutput, ScanError> {
        let load_errors: Vec<String> = packages
            .iter()
            .flat_map(|p| p.errors.iter().cloned())
            .collect();
        if !load_errors.is_empty() {
            return Err(ScanError::PackageErrors {
                errors: load_errors,
            });
        }

        let mut pkg_index = FxHashMap::default();
        for pkg in packages {
            pkg_index.insert(pkg.name.clone(), pkg.pkg_path.clone());
            for imp in &pkg.imports {
                pkg_index.insert(imp.name.clone(), imp.pkg_path.clone());
            }
        }

        let iface_catalogue = self.build_iface_catalogue(table, packages);

        let mut providers = Vec::new();
        for pkg in packages {
            if self.should_exclude(&pkg.pkg_path) {
                debug!(package = %pkg.pkg_path, "excluded from scan");
                continue;
            }
            let found = self.extract_providers(table, pkg);
            debug!(package = %pkg.pkg_path, count = found.len(), "extracted providers");
            providers.extend(found);
        }

        Ok(ScanOutput {
            providers,
            pkg_index,
            iface_catalogue,
        })
    }

    /// Collect every exported interface type declared in the loaded
    /// packages. Auto-collection falls back to this catalogue when an
    /// interface never appears in a provider signature.
    fn build_iface_catalogue(
        &self,
        table: &TypeTable,
        packages: &[LoadedPackage],
    ) -> FxHashMap<String, TypeId> {
        let mut catalogue = FxHashMap::default();
        for pkg in packages {
            for &ty in &pkg.decl_types {
                if table.interface_id(ty).is_some() {
                    catalogue.insert(table.qualified(ty), ty);
                }
            }
        }
        catalogue
    }

    fn should_exclude(&self, pkg_path: &str) -> bool {
        for exc in &self.cfg.exclude {
            let exc = exc.trim_start_matches("./");
            let exc = exc.strip_suffix("/...").unwrap_or(exc);
            let full = format!("{}/{}", self.cfg.module, exc);
            if pkg_path.starts_with(&full) {
                return true;
            }
        }

        let rel = pkg_path
            .strip_prefix(&self.cfg.module)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(pkg_path);
        self.filter.is_ignored(rel)
    }

    /// Select the providers of one package.
    ///
    /// `bind`/`invoke`-annotated constructors always opt in. The rest are
    /// ranked by naming convention and included only when none of their
    /// products are already covered, so a multi-return constructor subsumes
    /// its single-return siblings deterministically.
    fn extract_providers(&self, table: &TypeTable, pkg: &LoadedPackage) -> Vec<Provider> {
        let mut always_include = Vec::new();
        let mut candidates: Vec<(Provider, u8)> = Vec::new();

        for func in &pkg.funcs {
            if !func.name.starts_with("New") || !is_exported(&func.name) {
                continue;
            }

            let annotations = parse_annotations(&func.doc);
            if has_annotation(&annotations, AnnotationKind::Ignore) {
                continue;
            }

            // Variant constructors (NewXxxWithConfig, NewXxxFromEnv, ...)
            // never become the package primary.
            if func.name.contains("With") || func.name.contains("From") {
                continue;
            }

            let Some(provider) = self.build_provider(table, pkg, func, annotations) else {
                continue;
            };

            if has_annotation(&provider.annotations, AnnotationKind::Bind)
                || has_annotation(&provider.annotations, AnnotationKind::Invoke)
            {
                always_include.push(provider);
            } else {
                let priority = func_priority(&pkg.name, &func.name);
                candidates.push((provider, priority));
            }
        }

        // Stable sort keeps declaration order within a priority class.
        candidates.sort_by_key(|(_, priority)| *priority);

        let mut provided: FxHashSet<String> = FxHashSet::default();
        for p in &always_include {
            for ret in &p.returns {
                provided.insert(ret.type_str.clone());
            }
        }

        let mut providers = always_include;
        for (candidate, _) in candidates {
            let overlap = candidate
                .returns
                .iter()
                .any(|ret| provided.contains(&ret.type_str));
            if overlap {
                continue;
            }
            for ret in &candidate.returns {
                provided.insert(ret.type_str.clone());
            }
            providers.push(candidate);
        }

        providers
    }

    fn build_provider(
        &self,
        table: &TypeTable,
        pkg: &LoadedPackage,
        func: &FuncDecl,
        annotations: Vec<Annotation>,
    ) -> Option<Provider> {
        let (returns, has_error) = extract_returns(table, func);
        if returns.is_empty() {
            return None;
        }
        let params = extract_params(table, func, &annotations);

        Some(Provider {
            func_name: func.name.clone(),
            pkg_path: pkg.pkg_path.clone(),
            pkg_name: pkg.name.clone(),
            params,
            returns,
            has_error,
            is_invoke: has_annotation(&annotations, AnnotationKind::Invoke),
            annotations,
            position: func.position.clone(),
            groups: Vec::new(),
        })
    }
}

/// How well a constructor name matches the "primary New" convention.
/// Lower is better.
fn func_priority(pkg_name: &str, func_name: &str) -> u8 {
    let suffix = func_name.strip_prefix("New").unwrap_or(func_name);
    if suffix.eq_ignore_ascii_case(pkg_name) {
        return 0;
    }
    if suffix.is_empty() {
        return 1;
    }
    if suffix == "Service" {
        return 2;
    }
    3
}

/// Parse return slots into products, stripping a trailing `error`.
fn extract_returns(table: &TypeTable, func: &FuncDecl) -> (SmallVec4<TypeRef>, bool) {
    let mut refs = SmallVec4::new();
    let mut has_error = false;

    let last = func.results.len().saturating_sub(1);
    for (i, &result) in func.results.iter().enumerate() {
        if i == last && table.is_error(result) {
            has_error = true;
            continue;
        }
        refs.push(TypeRef::from_type(table, result));
    }

    (refs, has_error)
}

/// Parse parameter slots as dependencies, applying `optional` suffixes.
fn extract_params(
    table: &TypeTable,
    func: &FuncDecl,
    annotations: &[Annotation],
) -> SmallVec4<TypeRef> {
    let optional_suffixes = annotation_values(annotations, AnnotationKind::Optional);

    func.params
        .iter()
        .map(|&param| {
            let mut type_ref = TypeRef::from_type(table, param);
            type_ref.optional = optional_suffixes
                .iter()
                .any(|suffix| type_ref.type_str.ends_with(suffix));
            type_ref
        })
        .collect()
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ranks_conventional_names_first() {
        assert_eq!(func_priority("iam", "NewIAM"), 0);
        assert_eq!(func_priority("redisx", "New"), 1);
        assert_eq!(func_priority("user", "NewService"), 2);
        assert_eq!(func_priority("mq", "NewConsumer"), 3);
    }

    #[test]
    fn exported_means_leading_uppercase() {
        assert!(is_exported("NewIAM"));
        assert!(!is_exported("newIAM"));
        assert!(!is_exported(""));
    }
}
