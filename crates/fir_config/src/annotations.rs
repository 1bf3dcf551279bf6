//! Annotation files.
//!
//! A JSON file holds an array of records. A TOML file holds the same records
//! as an `[[annotations]]` table array. Each record is
//! `{ kind = "source" | "sink", target = "...", pin = "..." }`.

use crate::error::ConfigError;
use fir_ir::Annotation;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct AnnotationFile {
    #[serde(default)]
    annotations: Vec<Annotation>,
}

/// Loads annotations from a `.json` or `.toml` file.
pub fn load_annotations(path: &Path) -> Result<Vec<Annotation>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_annotations_json(&content),
        Some("toml") => parse_annotations_toml(&content),
        _ => Err(ConfigError::ValidationError(format!(
            "annotation file '{}' must end in .json or .toml",
            path.display()
        ))),
    }
}

/// Parses a JSON array of annotation records.
pub fn parse_annotations_json(content: &str) -> Result<Vec<Annotation>, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Parses an `[[annotations]]` table array.
pub fn parse_annotations_toml(content: &str) -> Result<Vec<Annotation>, ConfigError> {
    toml::from_str::<AnnotationFile>(content)
        .map(|f| f.annotations)
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fir_ir::{ComponentName, Target};

    fn expected() -> Vec<Annotation> {
        vec![
            Annotation::source(ComponentName::new("Core", "debugBus"), "debug"),
            Annotation::sink(
                Target::Component(ComponentName::new("Monitor", "io.dbg")),
                "debug",
            ),
        ]
    }

    #[test]
    fn json_records() {
        let json = r#"[
            {"kind": "source", "target": "Core>debugBus", "pin": "debug"},
            {"kind": "sink", "target": "Monitor>io.dbg", "pin": "debug"}
        ]"#;
        assert_eq!(parse_annotations_json(json).unwrap(), expected());
    }

    #[test]
    fn toml_records() {
        let toml = r#"
[[annotations]]
kind = "source"
target = "Core>debugBus"
pin = "debug"

[[annotations]]
kind = "sink"
target = "Monitor>io.dbg"
pin = "debug"
"#;
        assert_eq!(parse_annotations_toml(toml).unwrap(), expected());
        assert!(parse_annotations_toml("").unwrap().is_empty());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"[{"kind": "probe", "target": "A", "pin": "p"}]"#;
        assert!(matches!(
            parse_annotations_json(json),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("wiring.json");
        std::fs::write(&json, serde_json::to_string(&expected()).unwrap()).unwrap();
        assert_eq!(load_annotations(&json).unwrap(), expected());

        let other = dir.path().join("wiring.yaml");
        std::fs::write(&other, "").unwrap();
        assert!(matches!(
            load_annotations(&other),
            Err(ConfigError::ValidationError(_))
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_annotations(&missing),
            Err(ConfigError::IoError(_))
        ));
    }
}
