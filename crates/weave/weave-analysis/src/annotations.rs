//! `weave:` directives parsed from constructor doc comments.

use serde::{Deserialize, Serialize};

/// Directive prefix inside a doc comment line.
pub const DIRECTIVE_PREFIX: &str = "weave:";

/// The recognized directive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// `weave:bind <TargetInterface>`: the first return satisfies the interface.
    Bind,
    /// `weave:ignore`: exclude the function entirely.
    Ignore,
    /// `weave:invoke`: execute for side effect; products are not registered.
    Invoke,
    /// `weave:optional <TypeSuffix>`: matching parameters are non-fatal.
    Optional,
}

impl AnnotationKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "bind" => Some(Self::Bind),
            "ignore" => Some(Self::Ignore),
            "invoke" => Some(Self::Invoke),
            "optional" => Some(Self::Optional),
            _ => None,
        }
    }
}

/// A parsed `weave:` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub value: String,
}

/// Extract `weave:` directives from doc comment lines.
/// Unknown directive kinds are ignored.
pub fn parse_annotations(doc: &[String]) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    for line in doc {
        let text = line.trim();
        let text = text.strip_prefix("//").unwrap_or(text).trim();
        let Some(directive) = text.strip_prefix(DIRECTIVE_PREFIX) else {
            continue;
        };

        let (kind, value) = match directive.split_once(' ') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (directive.trim(), ""),
        };
        if let Some(kind) = AnnotationKind::parse(kind) {
            annotations.push(Annotation {
                kind,
                value: value.to_string(),
            });
        }
    }
    annotations
}

/// Whether any annotation of the given kind is present.
pub fn has_annotation(annotations: &[Annotation], kind: AnnotationKind) -> bool {
    annotations.iter().any(|a| a.kind == kind)
}

/// All non-empty values for the given annotation kind.
pub fn annotation_values<'a>(annotations: &'a [Annotation], kind: AnnotationKind) -> Vec<&'a str> {
    annotations
        .iter()
        .filter(|a| a.kind == kind && !a.value.is_empty())
        .map(|a| a.value.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_directives_with_and_without_values() {
        let annotations = parse_annotations(&doc(&[
            "// NewIAM constructs the IAM service.",
            "//weave:bind iam.AuthN",
            "// weave:optional *redis.Client",
            "//weave:invoke",
        ]));

        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations[0].kind, AnnotationKind::Bind);
        assert_eq!(annotations[0].value, "iam.AuthN");
        assert_eq!(annotations[1].kind, AnnotationKind::Optional);
        assert_eq!(annotations[1].value, "*redis.Client");
        assert_eq!(annotations[2].kind, AnnotationKind::Invoke);
        assert!(annotations[2].value.is_empty());
    }

    #[test]
    fn ignores_unknown_directives_and_plain_prose() {
        let annotations = parse_annotations(&doc(&[
            "// plain prose mentioning weave: nothing",
            "//weave:frobnicate xyz",
        ]));
        assert!(annotations.is_empty());
    }

    #[test]
    fn values_skip_empty_and_filter_by_kind() {
        let annotations = parse_annotations(&doc(&[
            "//weave:optional *cache.Client",
            "//weave:optional",
            "//weave:bind iam.AuthN",
        ]));
        assert_eq!(
            annotation_values(&annotations, AnnotationKind::Optional),
            vec!["*cache.Client"]
        );
        assert!(has_annotation(&annotations, AnnotationKind::Bind));
        assert!(!has_annotation(&annotations, AnnotationKind::Ignore));
    }
}
