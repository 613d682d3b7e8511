//! Top-level weave configuration.
//!
//! The config is assembled by an external front end (module-file and
//! directive parsing live there); this crate owns the shape, the TOML
//! round-trip, and validation.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::collections::BTreeMap;

/// Configuration for one generator run.
///
/// Map-valued fields are `BTreeMap` so that iteration order is lexical by
/// construction; binding resolution and group classification feed user
/// output and must be deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    /// Module root identifier; prefix of every in-module package path.
    pub module: String,
    /// Path-prefix patterns to scan for providers.
    pub scan: Vec<String>,
    /// Path-prefix patterns excluded from scanning.
    pub exclude: Vec<String>,
    /// Output directory for the emitter, relative to the module root.
    pub output: String,
    /// Explicit interface bindings: concrete short name → interface short names.
    pub bindings: BTreeMap<String, Vec<String>>,
    /// Provider groups: group name → interface + path prefixes.
    pub groups: BTreeMap<String, GroupConfig>,
    /// Application metadata forwarded to the emitter.
    pub app: AppConfig,
}

/// A named collection of providers implementing one interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Short name of the interface every member must satisfy.
    pub interface: String,
    /// Module-relative path prefixes that define membership.
    pub paths: Vec<String>,
}

/// Application identity used by the emitter for the generated entry point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub short: String,
    pub long: String,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        Self {
            module: String::new(),
            scan: vec!["internal/...".to_string(), "pkg/...".to_string()],
            exclude: Vec::new(),
            output: ".".to_string(),
            bindings: BTreeMap::new(),
            groups: BTreeMap::new(),
            app: AppConfig::default(),
        }
    }
}

impl WeaveConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Validate structural constraints the rest of the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "output".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        for (name, group) in &self.groups {
            if group.paths.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("groups.{name}.paths"),
                    message: "must list at least one path prefix".to_string(),
                });
            }
            if group.interface.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("groups.{name}.interface"),
                    message: "must name the member interface".to_string(),
                });
            }
        }
        for (concrete, ifaces) in &self.bindings {
            if ifaces.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("bindings.{concrete}"),
                    message: "must list at least one interface".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_scan_the_conventional_trees() {
        let config = WeaveConfig::default();
        assert_eq!(config.scan, vec!["internal/...", "pkg/..."]);
        assert_eq!(config.output, ".");
    }

    #[test]
    fn parses_groups_and_bindings_from_toml() {
        let config = WeaveConfig::from_toml(
            r#"
            module = "example.com/app"

            [bindings]
            "*iam.IAM" = ["iam.AuthN"]

            [groups.user_controllers]
            interface = "apis.Controller"
            paths = ["internal/apis/user/controllers"]

            [app]
            name = "app"
            short = "Example app"
            "#,
        )
        .unwrap();

        assert_eq!(config.module, "example.com/app");
        assert_eq!(config.bindings["*iam.IAM"], vec!["iam.AuthN"]);
        assert_eq!(
            config.groups["user_controllers"].paths,
            vec!["internal/apis/user/controllers"]
        );
        assert_eq!(config.app.name, "app");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = WeaveConfig::from_toml("module = [").unwrap_err();
        assert!(matches!(&err, ConfigError::ParseError { .. }), "{err}");
    }

    #[test]
    fn rejects_group_without_paths() {
        let err = WeaveConfig::from_toml(
            r#"
            module = "example.com/app"
            [groups.listeners]
            interface = "mq.Listener"
            paths = []
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("groups.listeners.paths"), "{err}");
    }

    #[test]
    fn toml_round_trip_preserves_bindings() {
        let mut config = WeaveConfig::default();
        config.module = "example.com/app".to_string();
        config
            .bindings
            .insert("*iam.IAM".to_string(), vec!["iam.AuthN".to_string()]);

        let parsed = WeaveConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.bindings, config.bindings);
    }
}
