//! The wiring transform.
//!
//! Each pin label names one source component and any number of sinks. For
//! every instance of every sink, the pass finds the lowest common ancestor
//! of the sink and the source in the instance hierarchy, threads an output
//! port up from the source to that ancestor and an input port down from it
//! to the sink, and connects the chain.

use std::collections::HashMap;

use fir_common::Namespace;
use fir_ir::{
    Circuit, CircuitState, ComponentName, DefModule, Direction, Expression, InstanceGraph,
    InstancePath, Port, Statement, Target, Transform, Type,
};

use crate::error::WiringError;
use crate::resolve::{component_expr, component_type, is_declared};

/// All directives sharing one pin label, in annotation order.
#[derive(Debug, Default)]
struct PinGroup {
    pin: String,
    sources: Vec<ComponentName>,
    sinks: Vec<Target>,
}

/// Groups annotations by pin, keeping the order in which pins first appear.
fn group_by_pin(state: &CircuitState) -> Vec<PinGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<PinGroup> = Vec::new();
    for ann in &state.annotations {
        let i = *index.entry(ann.pin()).or_insert_with(|| {
            groups.push(PinGroup {
                pin: ann.pin().to_string(),
                ..PinGroup::default()
            });
            groups.len() - 1
        });
        match ann {
            fir_ir::Annotation::Source(s) => groups[i].sources.push(s.target.clone()),
            fir_ir::Annotation::Sink(s) => groups[i].sinks.push(s.target.clone()),
        }
    }
    groups
}

/// Ports and statements to append to one module.
#[derive(Debug, Default)]
struct ModuleEdits {
    ports: Vec<Port>,
    stmts: Vec<Statement>,
}

/// Accumulates the edits of a run before the new circuit is built.
struct Wiring<'c> {
    circuit: &'c Circuit,
    graph: InstanceGraph,
    namespaces: HashMap<String, Namespace>,
    edits: HashMap<String, ModuleEdits>,
    /// `(module, pin, direction)` to the port already added for it.
    ports: HashMap<(String, String, Direction), String>,
}

impl<'c> Wiring<'c> {
    fn new(circuit: &'c Circuit) -> Self {
        Self {
            circuit,
            graph: InstanceGraph::new(circuit),
            namespaces: HashMap::new(),
            edits: HashMap::new(),
            ports: HashMap::new(),
        }
    }

    fn module(&self, pin: &str, name: &str) -> Result<&'c DefModule, WiringError> {
        self.circuit
            .module(name)
            .ok_or_else(|| WiringError::UnresolvedModule {
                pin: pin.to_string(),
                module: name.to_string(),
            })
    }

    /// The module at `depth` along `path`; depth 0 is `main`.
    fn module_at<'p>(&'p self, path: &'p InstancePath, depth: usize) -> &'p str {
        match depth {
            0 => self.graph.main(),
            d => &path[d - 1].module,
        }
    }

    /// The name of the `direction` port carrying `pin` in `module`, adding
    /// the port on first use.
    fn port(
        &mut self,
        module: &str,
        pin: &str,
        direction: Direction,
        tpe: &Type,
    ) -> Result<String, WiringError> {
        let key = (module.to_string(), pin.to_string(), direction);
        if let Some(name) = self.ports.get(&key) {
            return Ok(name.clone());
        }
        let def = self.module(pin, module)?;
        if def.is_external() {
            return Err(WiringError::ExternalModule {
                pin: pin.to_string(),
                module: module.to_string(),
            });
        }
        let namespace = self
            .namespaces
            .entry(module.to_string())
            .or_insert_with(|| module_namespace(def));
        let name = namespace.fresh(&port_base(pin));
        log::debug!("adding {} port `{name}` to `{module}` for pin `{pin}`", direction.keyword());
        self.edits
            .entry(module.to_string())
            .or_default()
            .ports
            .push(Port::new(name.clone(), direction, tpe.clone()));
        self.ports.insert(key, name.clone());
        Ok(name)
    }

    /// Adds `loc <= expr` to `module` unless it is already there.
    fn connect(&mut self, module: &str, loc: Expression, expr: Expression) {
        let stmt = Statement::connect(loc, expr);
        let stmts = &mut self.edits.entry(module.to_string()).or_default().stmts;
        if !stmts.contains(&stmt) {
            stmts.push(stmt);
        }
    }

    /// Resolves every target of a pin against the circuit.
    fn resolve(&self, group: &PinGroup) -> Result<(), WiringError> {
        let components = group.sources.iter().chain(group.sinks.iter().filter_map(|t| match t {
            Target::Component(c) => Some(c),
            Target::Module(_) => None,
        }));
        for component in components {
            let module = self.module(&group.pin, &component.module)?;
            if !is_declared(module, component.root()) {
                return Err(WiringError::UnresolvedComponent {
                    pin: group.pin.clone(),
                    target: component.to_string(),
                });
            }
        }
        for sink in &group.sinks {
            if let Target::Module(m) = sink {
                self.module(&group.pin, m)?;
            }
        }
        Ok(())
    }

    fn wire_pin(&mut self, group: &PinGroup) -> Result<(), WiringError> {
        let pin = group.pin.as_str();
        let source = &group.sources[0];
        let source_module = self.module(pin, &source.module)?;
        let tpe = component_type(self.circuit, source_module, source)?
            .filter(|t| !t.contains_unknown())
            .ok_or_else(|| WiringError::UnknownSourceType {
                pin: pin.to_string(),
                target: source.to_string(),
            })?;
        let source_expr = component_expr(source)?;

        let mut source_paths = self.graph.instance_paths(&source.module);
        if source_paths.len() != 1 {
            return Err(WiringError::SourceNotUnique {
                pin: pin.to_string(),
                module: source.module.clone(),
                count: source_paths.len(),
            });
        }
        let source_path = source_paths.remove(0);
        log::debug!(
            "wiring pin `{pin}` from `{source}` to {} sink(s) as {}",
            group.sinks.len(),
            fir_ir::serialize_type(&tpe)
        );

        for sink in &group.sinks {
            let sink_paths = self.graph.instance_paths(sink.module());
            if sink_paths.is_empty() {
                return Err(WiringError::SinkNotInstantiated {
                    pin: pin.to_string(),
                    module: sink.module().to_string(),
                });
            }
            for sink_path in &sink_paths {
                self.wire_path(pin, &tpe, source, &source_expr, &source_path, sink, sink_path)?;
            }
        }
        Ok(())
    }

    /// Wires one source to one instance of one sink.
    #[allow(clippy::too_many_arguments)]
    fn wire_path(
        &mut self,
        pin: &str,
        tpe: &Type,
        source: &ComponentName,
        source_expr: &Expression,
        source_path: &InstancePath,
        sink: &Target,
        sink_path: &InstancePath,
    ) -> Result<(), WiringError> {
        let lca = source_path
            .iter()
            .zip(sink_path)
            .take_while(|(a, b)| a == b)
            .count();
        if matches!(sink, Target::Module(_)) && lca == sink_path.len() {
            return Err(WiringError::SinkContainsSource {
                pin: pin.to_string(),
                module: sink.module().to_string(),
                source_target: source.to_string(),
            });
        }

        // Up from the source to the common ancestor.
        let mut value = source_expr.clone();
        for depth in (lca + 1..=source_path.len()).rev() {
            let module = self.module_at(source_path, depth).to_string();
            let port = self.port(&module, pin, Direction::Output, tpe)?;
            self.connect(&module, Expression::untyped(port.clone()), value);
            value = Expression::untyped(source_path[depth - 1].instance.clone()).field(port);
        }

        // Down from the common ancestor to the sink.
        for depth in lca + 1..=sink_path.len() {
            let parent = self.module_at(sink_path, depth - 1).to_string();
            let module = self.module_at(sink_path, depth).to_string();
            let port = self.port(&module, pin, Direction::Input, tpe)?;
            let loc = Expression::untyped(sink_path[depth - 1].instance.clone()).field(port.clone());
            self.connect(&parent, loc, value);
            value = Expression::untyped(port);
        }

        if let Target::Component(c) = sink {
            let loc = component_expr(c)?;
            self.connect(&c.module, loc, value);
        }
        Ok(())
    }

    /// Builds the new circuit with every accumulated edit applied.
    fn finish(mut self) -> Circuit {
        let modules = self
            .circuit
            .modules
            .iter()
            .map(|m| match (m, self.edits.remove(m.name())) {
                (
                    DefModule::Module {
                        info,
                        name,
                        ports,
                        body,
                    },
                    Some(edits),
                ) => {
                    let mut stmts = match body {
                        Statement::Block(stmts) => stmts.clone(),
                        other => vec![other.clone()],
                    };
                    stmts.extend(edits.stmts);
                    DefModule::Module {
                        info: info.clone(),
                        name: name.clone(),
                        ports: ports.iter().cloned().chain(edits.ports).collect(),
                        body: Statement::Block(stmts),
                    }
                }
                (m, _) => m.clone(),
            })
            .collect();
        Circuit {
            info: self.circuit.info.clone(),
            modules,
            main: self.circuit.main.clone(),
        }
    }
}

/// The identifier a port carrying `pin` is named after.
///
/// Pin labels are free text. Characters an identifier cannot hold become `_`,
/// and a label that would start with a digit gets a leading `_`.
fn port_base(pin: &str) -> String {
    let mut base: String = pin
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if base.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
        base.insert(0, '_');
    }
    base
}

/// Every name already used in `module`, so fresh port names never collide.
fn module_namespace(module: &DefModule) -> Namespace {
    let mut names: Vec<&str> = module.ports().iter().map(|p| p.name.as_str()).collect();
    if let Some(body) = module.body() {
        names.extend(body.declarations().into_iter().filter_map(|d| d.name()));
    }
    Namespace::with_names(names)
}

/// Connects wiring sources to their sinks through the instance hierarchy.
///
/// Consumes every source and sink annotation of the state. Sources without a
/// sink are dropped with a warning. The input circuit should have passed
/// validation; the pass resolves names but does not re-check structure.
#[derive(Debug, Default, Clone, Copy)]
pub struct WiringTransform;

impl WiringTransform {
    /// Creates the transform.
    pub fn new() -> Self {
        Self
    }
}

impl Transform for WiringTransform {
    type Error = WiringError;

    fn name(&self) -> &'static str {
        "wiring"
    }

    fn execute(&self, state: &CircuitState) -> Result<CircuitState, WiringError> {
        let groups = group_by_pin(state);
        for group in &groups {
            if group.sources.len() > 1 {
                return Err(WiringError::DuplicateSource {
                    pin: group.pin.clone(),
                    targets: group.sources.iter().map(|s| s.to_string()).collect(),
                });
            }
        }

        let mut wiring = Wiring::new(&state.circuit);
        for group in &groups {
            wiring.resolve(group)?;
        }
        for group in &groups {
            match (group.sources.is_empty(), group.sinks.is_empty()) {
                (true, _) => {
                    return Err(WiringError::MissingSource {
                        pin: group.pin.clone(),
                    })
                }
                (false, true) => {
                    log::warn!(
                        "pin `{}` has a source `{}` but no sinks; dropping it",
                        group.pin,
                        group.sources[0]
                    );
                }
                (false, false) => wiring.wire_pin(group)?,
            }
        }

        let added: usize = wiring.edits.values().map(|e| e.ports.len()).sum();
        log::info!("wiring: {} pin(s), {added} port(s) added", groups.len());
        // Every annotation kind is a wiring directive, so none survive.
        Ok(CircuitState::from_circuit(wiring.finish()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fir_ir::Annotation;

    const HIERARCHY: &str = "\
circuit Top :
  module Top :
    input clock : Clock

    inst core of Core
    inst mon of Monitor
  module Core :
    input clock : Clock

    inst alu of Alu
  module Alu :
    input clock : Clock

    wire status : UInt<4>
    status <= UInt<4>(0)
  module Monitor :
    input clock : Clock

    wire seen : UInt<4>
";

    fn run(src: &str, anns: Vec<Annotation>) -> Result<CircuitState, WiringError> {
        let circuit = fir_parser::parse_str(src).unwrap();
        WiringTransform::new().execute(&CircuitState::new(circuit, anns))
    }

    fn source(target: &str, pin: &str) -> Annotation {
        Annotation::source(target.parse().unwrap(), pin)
    }

    fn sink(target: &str, pin: &str) -> Annotation {
        Annotation::sink(target.parse().unwrap(), pin)
    }

    fn module_text(state: &CircuitState, name: &str) -> String {
        state.circuit.module(name).unwrap().to_string()
    }

    #[test]
    fn threads_ports_through_common_ancestor() {
        let out = run(
            HIERARCHY,
            vec![source("Alu>status", "dbg"), sink("Monitor>seen", "dbg")],
        )
        .unwrap();
        assert!(out.annotations.is_empty());

        let alu = module_text(&out, "Alu");
        assert!(alu.contains("output dbg : UInt<4>"));
        assert!(alu.contains("dbg <= status"));

        let core = module_text(&out, "Core");
        assert!(core.contains("output dbg : UInt<4>"));
        assert!(core.contains("dbg <= alu.dbg"));

        let top = module_text(&out, "Top");
        assert!(top.contains("mon.dbg <= core.dbg"));
        assert!(!top.contains("output dbg"));

        let mon = module_text(&out, "Monitor");
        assert!(mon.contains("input dbg : UInt<4>"));
        assert!(mon.contains("seen <= dbg"));
    }

    #[test]
    fn port_names_are_identifiers() {
        assert_eq!(port_base("dbg"), "dbg");
        assert_eq!(port_base("a.b"), "a_b");
        assert_eq!(port_base("my pin"), "my_pin");
        assert_eq!(port_base("1x"), "_1x");
        assert_eq!(port_base("$v"), "$v");
        assert_eq!(port_base(""), "_");
    }

    #[test]
    fn free_text_pins_produce_parseable_circuits() {
        for pin in ["a.b", "1x", "my pin", "x[0]", "when"] {
            let out = run(
                HIERARCHY,
                vec![source("Alu>status", pin), sink("Monitor>seen", pin)],
            )
            .unwrap();
            let text = out.circuit.to_string();
            let parsed = match fir_parser::parse_str(&text) {
                Ok(c) => c,
                Err(e) => panic!("pin `{pin}`: {e}\n{text}"),
            };
            assert_eq!(parsed, out.circuit.canonical(), "pin `{pin}`");
            let base = port_base(pin);
            let mon = out.circuit.module("Monitor").unwrap();
            assert!(mon.port(&base).is_some(), "pin `{pin}`");
            assert!(module_text(&out, "Monitor").contains(&format!("seen <= {base}")));
        }
    }

    #[test]
    fn module_sink_receives_an_input_port() {
        let out = run(
            HIERARCHY,
            vec![source("Alu>status", "dbg"), sink("Monitor", "dbg")],
        )
        .unwrap();
        let mon = out.circuit.module("Monitor").unwrap();
        let port = mon.port("dbg").unwrap();
        assert_eq!(port.direction, Direction::Input);
        assert_eq!(port.tpe, Type::uint(4));
    }

    #[test]
    fn fresh_port_names_avoid_collisions() {
        let out = run(
            HIERARCHY,
            vec![source("Alu>status", "clock"), sink("Monitor>seen", "clock")],
        )
        .unwrap();
        let mon = module_text(&out, "Monitor");
        assert!(mon.contains("input clock_0 : UInt<4>"), "{mon}");
        assert!(mon.contains("seen <= clock_0"));
    }

    #[test]
    fn sink_in_source_module() {
        let src = "circuit T :\n  module T :\n    wire a : UInt<1>\n    wire b : UInt<1>\n";
        let out = run(src, vec![source("T>a", "p"), sink("T>b", "p")]).unwrap();
        let t = module_text(&out, "T");
        assert!(t.contains("b <= a"));
        assert!(out.circuit.module("T").unwrap().ports().is_empty());
    }

    #[test]
    fn every_sink_instance_is_wired_once() {
        let src = "\
circuit T :
  module T :
    wire s : UInt<2>

    inst a of L
    inst b of L
  module L :
    wire x : UInt<2>
";
        let out = run(src, vec![source("T>s", "p"), sink("L>x", "p")]).unwrap();
        let t = module_text(&out, "T");
        assert!(t.contains("a.p <= s"));
        assert!(t.contains("b.p <= s"));
        let l = out.circuit.module("L").unwrap();
        assert_eq!(l.ports().len(), 1);
        assert_eq!(module_text(&out, "L").matches("x <= p").count(), 1);
    }

    #[test]
    fn duplicate_source_fails() {
        let err = run(
            HIERARCHY,
            vec![source("Alu>status", "dbg"), source("Monitor>seen", "dbg")],
        )
        .unwrap_err();
        assert!(matches!(err, WiringError::DuplicateSource { ref pin, .. } if pin == "dbg"));
    }

    #[test]
    fn unresolved_targets_fail() {
        let err = run(HIERARCHY, vec![source("Nope>x", "p"), sink("Monitor", "p")]).unwrap_err();
        assert!(matches!(err, WiringError::UnresolvedModule { .. }));
        let err = run(HIERARCHY, vec![source("Alu>nope", "p"), sink("Monitor", "p")]).unwrap_err();
        assert!(matches!(err, WiringError::UnresolvedComponent { .. }));
    }

    #[test]
    fn missing_source_fails() {
        let err = run(HIERARCHY, vec![sink("Monitor", "p")]).unwrap_err();
        assert_eq!(err, WiringError::MissingSource { pin: "p".into() });
    }

    #[test]
    fn source_without_sink_is_dropped() {
        let before = fir_parser::parse_str(HIERARCHY).unwrap();
        let out = run(HIERARCHY, vec![source("Alu>status", "p")]).unwrap();
        assert_eq!(out.circuit, before);
        assert!(out.annotations.is_empty());
    }

    #[test]
    fn sink_enclosing_source_fails() {
        let err = run(HIERARCHY, vec![source("Alu>status", "p"), sink("Core", "p")]).unwrap_err();
        assert!(matches!(err, WiringError::SinkContainsSource { .. }));
    }

    #[test]
    fn source_in_shared_module_fails() {
        let src = "circuit T :\n  module T :\n    inst a of L\n    inst b of L\n  module L :\n    wire x : UInt<1>\n";
        let err = run(src, vec![source("L>x", "p"), sink("T", "p")]).unwrap_err();
        assert!(matches!(err, WiringError::SourceNotUnique { count: 2, .. }));
    }

    #[test]
    fn unknown_source_type_fails() {
        let src = "circuit T :\n  module T :\n    wire x : ?\n    inst l of L\n  module L :\n    wire y : UInt<1>\n";
        let err = run(src, vec![source("T>x", "p"), sink("L>y", "p")]).unwrap_err();
        assert!(matches!(err, WiringError::UnknownSourceType { .. }));
    }

    #[test]
    fn external_module_on_path_fails() {
        let src = "circuit T :\n  module T :\n    wire x : UInt<1>\n    inst e of E\n  extmodule E :\n    input y : UInt<1>\n";
        let err = run(src, vec![source("T>x", "p"), sink("E", "p")]).unwrap_err();
        assert!(matches!(err, WiringError::ExternalModule { .. }));
    }

    #[test]
    fn uninstantiated_sink_fails() {
        let src = "circuit T :\n  module T :\n    wire x : UInt<1>\n  module L :\n    wire y : UInt<1>\n";
        let err = run(src, vec![source("T>x", "p"), sink("L>y", "p")]).unwrap_err();
        assert!(matches!(err, WiringError::SinkNotInstantiated { .. }));
    }
}
