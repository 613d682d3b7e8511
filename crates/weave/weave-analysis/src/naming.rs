//! Name mapping between canonical type strings, short forms, and container
//! field identifiers.

use weave_core::types::collections::FxHashMap;

/// Uppercase the first letter.
pub fn export_name(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Derive a container field name for a type string.
///
/// `*example.com/app/iam.IAM` → `IAM`, `*redisx.Locker` → `RedisxLocker`,
/// `*ent.Client` → `EntClient`. When the type name already incorporates the
/// package name the package prefix is dropped.
pub fn field_name(type_str: &str) -> String {
    let s = type_str.strip_prefix('*').unwrap_or(type_str);

    let Some(dot) = s.rfind('.') else {
        return export_name(s);
    };
    let pkg_path = &s[..dot];
    let type_name = &s[dot + 1..];

    let pkg = short_pkg_name(pkg_path);

    if pkg.eq_ignore_ascii_case(type_name) {
        return export_name(type_name);
    }
    if type_name.len() > pkg.len()
        && type_name
            .get(..pkg.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&pkg))
    {
        return export_name(type_name);
    }
    export_name(&pkg) + &export_name(type_name)
}

/// Container field name for a group: `admin_controllers` → `AdminControllers`.
pub fn group_field_name(name: &str) -> String {
    name.split('_').map(export_name).collect()
}

/// Reduce a full type string to its short form:
/// `*example.com/app/iam.IAM` → `*iam.IAM`.
pub fn to_short_type_name(type_str: &str) -> String {
    let (prefix, s) = match type_str.strip_prefix('*') {
        Some(rest) => ("*", rest),
        None => ("", type_str),
    };

    let Some(dot) = s.rfind('.') else {
        return type_str.to_string();
    };
    let pkg_path = &s[..dot];
    let type_name = &s[dot + 1..];

    format!("{prefix}{}.{type_name}", short_pkg_name(pkg_path))
}

/// Last path segment, with version segments (`v2`, `v9`) replaced by the
/// previous segment reduced past its last `-` (`go-redis/v9` → `redis`).
fn short_pkg_name(pkg_path: &str) -> String {
    let parts: Vec<&str> = pkg_path.split('/').collect();
    let last = parts.last().copied().unwrap_or(pkg_path);

    if is_version_segment(last) && parts.len() >= 2 {
        let candidate = parts[parts.len() - 2];
        return match candidate.rfind('-') {
            Some(idx) => candidate[idx + 1..].to_string(),
            None => candidate.to_string(),
        };
    }
    last.to_string()
}

fn is_version_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'v' && bytes[1].is_ascii_digit()
}

/// Import alias needed for a package, or `None` when the plain name is
/// free. On a collision the parent segment is prepended, then the
/// grandparent, before falling back to a numeric suffix.
pub fn import_alias(
    pkg_path: &str,
    pkg_name: &str,
    used: &FxHashMap<String, String>,
) -> Option<String> {
    match used.get(pkg_name) {
        Some(existing) if existing != pkg_path => {}
        _ => return None,
    }

    let parts: Vec<&str> = pkg_path.split('/').collect();
    if parts.len() >= 2 {
        let parent = parts[parts.len() - 2];
        let alias = format!("{parent}{pkg_name}");
        if !used.contains_key(&alias) {
            return Some(alias);
        }
        if parts.len() >= 3 {
            return Some(format!("{}{parent}{pkg_name}", parts[parts.len() - 3]));
        }
    }
    Some(format!("{pkg_name}2"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_name_folds_package_into_matching_type_names() {
        assert_eq!(field_name("*example.com/app/internal/services/iam.IAM"), "IAM");
        assert_eq!(field_name("*example.com/app/pkg/redisx.Locker"), "RedisxLocker");
        assert_eq!(field_name("*example.com/app/ent.Client"), "EntClient");
        assert_eq!(
            field_name("example.com/app/pkg/redisx.RedisxPool"),
            "RedisxPool"
        );
    }

    #[test]
    fn field_name_handles_version_segments() {
        assert_eq!(
            field_name("*github.com/redis/go-redis/v9.Client"),
            "RedisClient"
        );
        assert_eq!(field_name("*example.com/app/pkg/mq/v2.Queue"), "MqQueue");
    }

    #[test]
    fn field_name_without_package_capitalizes() {
        assert_eq!(field_name("string"), "String");
    }

    #[test]
    fn group_field_name_capitalizes_each_part() {
        assert_eq!(group_field_name("admin_controllers"), "AdminControllers");
        assert_eq!(group_field_name("listeners"), "Listeners");
    }

    #[test]
    fn short_type_name_keeps_pointer_and_type() {
        assert_eq!(
            to_short_type_name("*example.com/app/internal/services/iam.IAM"),
            "*iam.IAM"
        );
        assert_eq!(
            to_short_type_name("github.com/redis/go-redis/v9.UniversalClient"),
            "redis.UniversalClient"
        );
        assert_eq!(to_short_type_name("error"), "error");
    }

    #[test]
    fn import_alias_prefers_parent_segments() {
        let mut used = FxHashMap::default();
        used.insert(
            "controllers".to_string(),
            "example.com/app/internal/apis/user/controllers".to_string(),
        );

        assert_eq!(
            import_alias(
                "example.com/app/internal/apis/admin/controllers",
                "controllers",
                &used,
            ),
            Some("admincontrollers".to_string())
        );
        assert_eq!(
            import_alias(
                "example.com/app/internal/apis/user/controllers",
                "controllers",
                &used,
            ),
            None
        );
    }
}
