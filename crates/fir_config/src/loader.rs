//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::collections::HashSet;
use std::path::Path;

/// The project file name looked up in a project directory.
pub const CONFIG_FILE: &str = "fir.toml";

/// Loads and validates a `fir.toml` configuration from a project directory.
///
/// Reads `<project_dir>/fir.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `fir.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.input.is_empty() {
        return Err(ConfigError::MissingField("project.input".to_string()));
    }

    let denied: HashSet<&str> = config.check.deny.iter().map(String::as_str).collect();
    if let Some(rule) = config.check.allow.iter().find(|r| denied.contains(r.as_str())) {
        return Err(ConfigError::ValidationError(format!(
            "rule '{rule}' is both allowed and denied"
        )));
    }

    let pins = config
        .wiring
        .sources
        .iter()
        .map(|s| &s.pin)
        .chain(config.wiring.sinks.iter().map(|s| &s.pin));
    for pin in pins {
        if pin.is_empty() {
            return Err(ConfigError::MissingField("wiring pin".to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "soc"
version = "0.1.0"
input = "src/Top.fir"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "soc");
        assert_eq!(config.project.version, "0.1.0");
        assert_eq!(config.project.input, "src/Top.fir");
        assert!(config.project.output.is_none());
        assert!(config.check.deny.is_empty());
        assert!(config.wiring.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "soc"
version = "0.1.0"
description = "debug bus wiring"
input = "src/Top.fir"
output = "build/Top.fir"
annotations = "wiring.json"

[check]
deny = ["unknown-type"]
allow = ["unreachable-module"]

[[wiring.sources]]
target = "Core>debugBus"
pin = "debug"

[[wiring.sinks]]
target = "Monitor"
pin = "debug"

[[wiring.sinks]]
target = "Logger>io.dbg"
pin = "debug"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.output.as_deref(), Some("build/Top.fir"));
        assert_eq!(config.project.annotations, vec!["wiring.json"]);
        assert_eq!(config.check.deny, vec!["unknown-type"]);
        assert_eq!(config.check.allow, vec!["unreachable-module"]);
        assert_eq!(config.wiring.sources.len(), 1);
        assert_eq!(config.wiring.sinks.len(), 2);
        assert_eq!(config.wiring.annotations().len(), 3);
    }

    #[test]
    fn missing_name_errors() {
        let toml = r#"
[project]
name = ""
version = "0.1.0"
input = "src/Top.fir"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn missing_input_errors() {
        let toml = r#"
[project]
name = "soc"
version = "0.1.0"
input = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "project.input"));
    }

    #[test]
    fn allow_and_deny_conflict() {
        let toml = r#"
[project]
name = "soc"
version = "0.1.0"
input = "Top.fir"

[check]
deny = "unknown-type"
allow = ["unknown-type"]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_pin_errors() {
        let toml = r#"
[project]
name = "soc"
version = "0.1.0"
input = "Top.fir"

[[wiring.sinks]]
target = "Monitor"
pin = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn malformed_target_is_a_parse_error() {
        let toml = r#"
[project]
name = "soc"
version = "0.1.0"
input = "Top.fir"

[[wiring.sinks]]
target = "A>b>c"
pin = "p"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nname = \"p\"\nversion = \"1\"\ninput = \"a.fir\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.input, "a.fir");
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
