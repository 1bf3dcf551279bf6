//! Configuration types deserialized from `fir.toml`.

use fir_ir::{Annotation, SinkAnnotation, SourceAnnotation};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level project configuration parsed from `fir.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, version, input and output circuits).
    pub project: ProjectMeta,
    /// Validation rule overrides.
    #[serde(default)]
    pub check: CheckConfig,
    /// Wiring annotations declared inline.
    #[serde(default)]
    pub wiring: WiringConfig,
}

/// Core project metadata required in every `fir.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// Path to the circuit text, relative to the project directory.
    pub input: String,
    /// Where `firc build` writes the transformed circuit. Standard output if absent.
    #[serde(default)]
    pub output: Option<String>,
    /// Extra annotation files to apply, relative to the project directory.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub annotations: Vec<String>,
}

/// Which validation rules to suppress and which to promote to errors.
///
/// Entries are rule names such as `unknown-type`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckConfig {
    /// Rules whose findings are reported as errors.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub deny: Vec<String>,
    /// Rules that are not run.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub allow: Vec<String>,
}

/// Source and sink directives for the wiring pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WiringConfig {
    /// `Module>component` drivers, one per pin.
    #[serde(default)]
    pub sources: Vec<SourceAnnotation>,
    /// Modules or components that receive a pin.
    #[serde(default)]
    pub sinks: Vec<SinkAnnotation>,
}

impl WiringConfig {
    /// All directives as annotations, sources first.
    pub fn annotations(&self) -> Vec<Annotation> {
        self.sources
            .iter()
            .cloned()
            .map(Annotation::Source)
            .chain(self.sinks.iter().cloned().map(Annotation::Sink))
            .collect()
    }

    /// Returns `true` if no directive is declared.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.sinks.is_empty()
    }
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `deny = "unknown-type"` as well as `deny = ["unknown-type"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fir_ir::{ComponentName, Target};

    #[test]
    fn check_accepts_string_or_list() {
        let c: CheckConfig = toml::from_str("deny = \"unknown-type\"\nallow = [\"a\", \"b\"]").unwrap();
        assert_eq!(c.deny, vec!["unknown-type"]);
        assert_eq!(c.allow, vec!["a", "b"]);
    }

    #[test]
    fn check_defaults_empty() {
        let c: CheckConfig = toml::from_str("").unwrap();
        assert!(c.deny.is_empty());
        assert!(c.allow.is_empty());
    }

    #[test]
    fn wiring_targets_parse_as_names() {
        let w: WiringConfig = toml::from_str(
            r#"
[[sources]]
target = "Core>debugBus"
pin = "debug"

[[sinks]]
target = "Monitor"
pin = "debug"
"#,
        )
        .unwrap();
        assert_eq!(
            w.annotations(),
            vec![
                Annotation::source(ComponentName::new("Core", "debugBus"), "debug"),
                Annotation::sink(Target::Module("Monitor".into()), "debug"),
            ]
        );
        assert!(!w.is_empty());
    }

    #[test]
    fn source_with_module_target_is_rejected() {
        let r: Result<WiringConfig, _> = toml::from_str("[[sources]]\ntarget = \"Core\"\npin = \"p\"\n");
        assert!(r.is_err());
    }
}
