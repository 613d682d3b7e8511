//! Short-form type name promotion to canonical form.

use super::types::Graph;

impl<'t> Graph<'t> {
    /// Resolve a short config type name to its full type string,
    /// e.g. `*iam.IAM` → `*example.com/app/internal/services/iam.IAM`.
    ///
    /// Resolution strategies, in order: already-canonical passthrough,
    /// direct short-form lookup, package-name composition, and a group-path
    /// segment heuristic whose hits are cached. Unresolvable names are
    /// returned unchanged; the caller surfaces the eventual lookup miss.
    pub fn resolve_config_type(&mut self, short_name: &str) -> String {
        if short_name.contains('/') {
            return short_name.to_string();
        }

        if let Some(full) = self.short_to_full.get(short_name) {
            return full.clone();
        }

        let (prefix, rest) = match short_name.strip_prefix('*') {
            Some(rest) => ("*", rest),
            None => ("", short_name),
        };
        if let Some((pkg_name, type_name)) = rest.split_once('.') {
            if !pkg_name.is_empty() {
                if let Some(pkg_path) = self.pkg_name_to_path.get(pkg_name) {
                    return format!("{prefix}{pkg_path}.{type_name}");
                }

                // Heuristic: a group path segment equal to the package name
                // pins the canonical package under the module root, e.g.
                // group path "internal/apis/user/controllers" resolves the
                // "apis" in "apis.Controller" to module/internal/apis.
                for gpath in &self.group_paths {
                    let parts: Vec<&str> = gpath.split('/').collect();
                    for (i, part) in parts.iter().enumerate() {
                        if *part == pkg_name {
                            let full_pkg =
                                format!("{}/{}", self.module, parts[..=i].join("/"));
                            self.pkg_name_to_path
                                .insert(pkg_name.to_string(), full_pkg.clone());
                            return format!("{prefix}{full_pkg}.{type_name}");
                        }
                    }
                }
            }
        }

        short_name.to_string()
    }
}
