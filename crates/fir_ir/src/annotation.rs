//! Out-of-band directives addressed to named parts of a circuit.
//!
//! Annotations never point into the tree. A [`Target`] names a module, or a
//! component declared in a module, and is resolved by name by the pass that
//! consumes it. The text form is `Module` or `Module>component`, where the
//! component may continue with a field and index path such as `io.out[2]`.

use crate::circuit::Circuit;
use fir_common::{FirResult, IrError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One step of a component path below its root name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// `.name`
    Field(String),
    /// `[n]`
    Index(usize),
}

/// A component of a module: a port or declaration, optionally followed by a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName {
    /// The module declaring the component.
    pub module: String,
    /// The component text, e.g. `io.out[2]`.
    pub component: String,
}

impl ComponentName {
    /// Creates a component name.
    pub fn new(module: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            component: component.into(),
        }
    }

    /// The port or declaration name the component starts with.
    pub fn root(&self) -> &str {
        let end = self
            .component
            .find(['.', '['])
            .unwrap_or(self.component.len());
        &self.component[..end]
    }

    /// Splits the component into its root name and the path below it.
    pub fn path(&self) -> FirResult<(String, Vec<PathElement>)> {
        let root = self.root();
        if root.is_empty() {
            return Err(IrError::new(format!(
                "component `{}` has no root name",
                self.component
            )));
        }
        let mut rest = &self.component[root.len()..];
        let mut path = Vec::new();
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('.') {
                let end = after.find(['.', '[']).unwrap_or(after.len());
                if end == 0 {
                    return Err(self.malformed());
                }
                path.push(PathElement::Field(after[..end].to_string()));
                rest = &after[end..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']').ok_or_else(|| self.malformed())?;
                let index = after[..close].parse().map_err(|_| self.malformed())?;
                path.push(PathElement::Index(index));
                rest = &after[close + 1..];
            } else {
                return Err(self.malformed());
            }
        }
        Ok((root.to_string(), path))
    }

    fn malformed(&self) -> IrError {
        IrError::new(format!("malformed component path `{}`", self.component))
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.module, self.component)
    }
}

impl FromStr for ComponentName {
    type Err = IrError;

    fn from_str(s: &str) -> FirResult<Self> {
        match s.parse::<Target>()? {
            Target::Component(c) => Ok(c),
            Target::Module(m) => Err(IrError::new(format!(
                "`{m}` names a module, expected `Module>component`"
            ))),
        }
    }
}

impl TryFrom<String> for ComponentName {
    type Error = IrError;

    fn try_from(s: String) -> FirResult<Self> {
        s.parse()
    }
}

impl From<ComponentName> for String {
    fn from(c: ComponentName) -> String {
        c.to_string()
    }
}

/// What an annotation is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Target {
    /// A whole module, by name.
    Module(String),
    /// A component of a module.
    Component(ComponentName),
}

impl Target {
    /// The module the target lives in.
    pub fn module(&self) -> &str {
        match self {
            Target::Module(m) => m,
            Target::Component(c) => &c.module,
        }
    }

    /// Returns `true` if the module the target lives in exists in `circuit`.
    pub fn module_exists(&self, circuit: &Circuit) -> bool {
        circuit.module(self.module()).is_some()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Module(m) => f.write_str(m),
            Target::Component(c) => write!(f, "{c}"),
        }
    }
}

impl FromStr for Target {
    type Err = IrError;

    fn from_str(s: &str) -> FirResult<Self> {
        let s = s.trim();
        match s.split_once('>') {
            None if s.is_empty() => Err(IrError::new("empty annotation target")),
            None => Ok(Target::Module(s.to_string())),
            Some((m, c)) if m.is_empty() || c.is_empty() || c.contains('>') => {
                Err(IrError::new(format!("malformed annotation target `{s}`")))
            }
            Some((m, c)) => Ok(Target::Component(ComponentName::new(m, c))),
        }
    }
}

impl TryFrom<String> for Target {
    type Error = IrError;

    fn try_from(s: String) -> FirResult<Self> {
        s.parse()
    }
}

impl From<Target> for String {
    fn from(t: Target) -> String {
        t.to_string()
    }
}

/// Marks a component as the driver of the wire labelled `pin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceAnnotation {
    /// The driving component.
    pub target: ComponentName,
    /// The wire label.
    pub pin: String,
}

impl SourceAnnotation {
    /// Creates a source annotation.
    pub fn new(target: ComponentName, pin: impl Into<String>) -> Self {
        Self {
            target,
            pin: pin.into(),
        }
    }

    /// The same directive rebound to `target`.
    pub fn duplicate(&self, target: ComponentName) -> Self {
        Self {
            target,
            pin: self.pin.clone(),
        }
    }
}

/// Marks a module or component as a receiver of the wire labelled `pin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SinkAnnotation {
    /// The receiving module or component.
    pub target: Target,
    /// The wire label.
    pub pin: String,
}

impl SinkAnnotation {
    /// Creates a sink annotation.
    pub fn new(target: Target, pin: impl Into<String>) -> Self {
        Self {
            target,
            pin: pin.into(),
        }
    }

    /// The same directive rebound to `target`.
    pub fn duplicate(&self, target: Target) -> Self {
        Self {
            target,
            pin: self.pin.clone(),
        }
    }
}

/// Any annotation understood by the toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Annotation {
    /// A wiring source.
    Source(SourceAnnotation),
    /// A wiring sink.
    Sink(SinkAnnotation),
}

impl Annotation {
    /// A source annotation on `Module>component`.
    pub fn source(target: ComponentName, pin: impl Into<String>) -> Self {
        Annotation::Source(SourceAnnotation::new(target, pin))
    }

    /// A sink annotation.
    pub fn sink(target: Target, pin: impl Into<String>) -> Self {
        Annotation::Sink(SinkAnnotation::new(target, pin))
    }

    /// The wire label.
    pub fn pin(&self) -> &str {
        match self {
            Annotation::Source(a) => &a.pin,
            Annotation::Sink(a) => &a.pin,
        }
    }

    /// What the annotation is attached to.
    pub fn target(&self) -> Target {
        match self {
            Annotation::Source(a) => Target::Component(a.target.clone()),
            Annotation::Sink(a) => a.target.clone(),
        }
    }

    /// Returns `true` for source annotations.
    pub fn is_source(&self) -> bool {
        matches!(self, Annotation::Source(_))
    }

    /// The same directive, same kind and pin, rebound to `target`.
    ///
    /// A source must name a component, so rebinding one to a module fails.
    pub fn duplicate(&self, target: Target) -> FirResult<Annotation> {
        match (self, target) {
            (Annotation::Source(a), Target::Component(c)) => Ok(Annotation::Source(a.duplicate(c))),
            (Annotation::Source(a), Target::Module(m)) => Err(IrError::new(format!(
                "source annotation for pin `{}` cannot target module `{m}`",
                a.pin
            ))),
            (Annotation::Sink(a), t) => Ok(Annotation::Sink(a.duplicate(t))),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_source() { "source" } else { "sink" };
        write!(f, "{kind} {} -> pin `{}`", self.target(), self.pin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_text_forms() {
        assert_eq!("Top".parse::<Target>().unwrap(), Target::Module("Top".into()));
        let t: Target = "Core>io.out[2]".parse().unwrap();
        assert_eq!(t, Target::Component(ComponentName::new("Core", "io.out[2]")));
        assert_eq!(t.to_string(), "Core>io.out[2]");
        assert_eq!(t.module(), "Core");
    }

    #[test]
    fn malformed_targets() {
        for bad in ["", ">x", "Top>", "A>b>c"] {
            assert!(bad.parse::<Target>().is_err(), "{bad:?} should not parse");
        }
        assert!("Top".parse::<ComponentName>().is_err());
    }

    #[test]
    fn component_paths() {
        let c = ComponentName::new("M", "io.out[2].valid");
        assert_eq!(c.root(), "io");
        let (root, path) = c.path().unwrap();
        assert_eq!(root, "io");
        assert_eq!(
            path,
            vec![
                PathElement::Field("out".into()),
                PathElement::Index(2),
                PathElement::Field("valid".into()),
            ]
        );
        assert_eq!(ComponentName::new("M", "r").path().unwrap().1, vec![]);
        assert!(ComponentName::new("M", "io.").path().is_err());
        assert!(ComponentName::new("M", "v[x]").path().is_err());
        assert!(ComponentName::new("M", "v[1").path().is_err());
    }

    #[test]
    fn duplicate_preserves_pin_and_kind() {
        let src = Annotation::source(ComponentName::new("A", "x"), "dbg");
        let moved = src
            .duplicate(Target::Component(ComponentName::new("B", "y")))
            .unwrap();
        assert!(moved.is_source());
        assert_eq!(moved.pin(), "dbg");
        assert_eq!(moved.target().to_string(), "B>y");

        let sink = Annotation::sink(Target::Module("C".into()), "dbg");
        let moved = sink
            .duplicate(Target::Component(ComponentName::new("D", "z")))
            .unwrap();
        assert!(!moved.is_source());
        assert_eq!(moved.pin(), "dbg");
        assert_eq!(moved.target().module(), "D");
    }

    #[test]
    fn source_cannot_move_to_module() {
        let src = Annotation::source(ComponentName::new("A", "x"), "dbg");
        assert!(src.duplicate(Target::Module("B".into())).is_err());
    }

    #[test]
    fn serde_records() {
        let anns = vec![
            Annotation::source(ComponentName::new("Core", "debugBus"), "debug"),
            Annotation::sink(Target::Module("Monitor".into()), "debug"),
        ];
        let json = serde_json::to_string(&anns).unwrap();
        assert!(json.contains(r#"{"kind":"source","target":"Core>debugBus","pin":"debug"}"#));
        let back: Vec<Annotation> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, anns);
    }

    #[test]
    fn serde_rejects_bad_source_target() {
        let json = r#"{"kind":"source","target":"Core","pin":"p"}"#;
        assert!(serde_json::from_str::<Annotation>(json).is_err());
    }
}
