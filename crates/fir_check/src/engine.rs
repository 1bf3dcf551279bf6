//! Check engine that manages rule registration, configuration, and execution.
//!
//! The `CheckEngine` accepts a `CheckConfig` to control which rules are denied
//! or allowed, then runs each enabled rule over the circuit and every module.

use std::collections::HashSet;

use fir_config::CheckConfig;
use fir_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use fir_ir::Circuit;

use crate::rules::register_builtin_rules;
use crate::CheckRule;

/// The engine that orchestrates running check rules on a circuit.
///
/// Rules are registered at construction time. The engine respects the
/// `CheckConfig` to suppress rules (allow) or promote their findings to
/// errors (deny). A rule may be named by its name (`unknown-type`) or its
/// code (`W101`).
pub struct CheckEngine {
    /// All registered rules.
    rules: Vec<Box<dyn CheckRule>>,
    /// Rules whose findings are promoted to error severity.
    denied: HashSet<String>,
    /// Rules that are not run.
    allowed: HashSet<String>,
}

impl CheckEngine {
    /// Creates a new engine configured by the given `CheckConfig`.
    ///
    /// All builtin rules are registered automatically.
    pub fn new(config: &CheckConfig) -> Self {
        let mut engine = Self {
            rules: Vec::new(),
            denied: config.deny.iter().cloned().collect(),
            allowed: config.allow.iter().cloned().collect(),
        };
        register_builtin_rules(&mut engine);
        engine
    }

    /// Creates a new engine with default configuration (no overrides).
    pub fn with_defaults() -> Self {
        Self::new(&CheckConfig::default())
    }

    /// Registers a rule with the engine.
    pub fn register(&mut self, rule: Box<dyn CheckRule>) {
        self.rules.push(rule);
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the names of all registered rules.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Returns the registered rules, in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn CheckRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    fn matches(set: &HashSet<String>, rule: &dyn CheckRule) -> bool {
        set.contains(rule.name()) || set.contains(&rule.code().to_string())
    }

    /// Runs all enabled rules on the circuit and then on every module.
    ///
    /// If a rule is allowed it is skipped. If it is denied, its findings
    /// are promoted to error severity.
    pub fn run(&self, circuit: &Circuit, sink: &DiagnosticSink) {
        log::debug!(
            "checking circuit `{}` ({} modules) with {} rules",
            circuit.main,
            circuit.modules.len(),
            self.rules.len()
        );
        let enabled: Vec<&dyn CheckRule> = self
            .rules()
            .filter(|r| !Self::matches(&self.allowed, *r))
            .collect();

        for rule in &enabled {
            let temp_sink = DiagnosticSink::new();
            rule.check_circuit(circuit, &temp_sink);
            self.transfer(*rule, temp_sink, sink);
        }
        for module in &circuit.modules {
            for rule in &enabled {
                let temp_sink = DiagnosticSink::new();
                rule.check_module(module, circuit, &temp_sink);
                self.transfer(*rule, temp_sink, sink);
            }
        }
    }

    /// Runs all enabled rules and returns their findings.
    pub fn check(&self, circuit: &Circuit) -> Vec<Diagnostic> {
        let sink = DiagnosticSink::new();
        self.run(circuit, &sink);
        let diagnostics = sink.take_all();
        log::debug!("check found {} issues", diagnostics.len());
        diagnostics
    }

    fn transfer(&self, rule: &dyn CheckRule, from: DiagnosticSink, to: &DiagnosticSink) {
        let is_denied = Self::matches(&self.denied, rule);
        for mut diag in from.take_all() {
            if is_denied {
                diag.severity = Severity::Error;
            }
            to.emit(diag);
        }
    }
}
