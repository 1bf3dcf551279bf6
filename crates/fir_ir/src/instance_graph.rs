//! The module instantiation hierarchy.
//!
//! Nodes are modules and an edge `A -> B` labelled `u` means module `A`
//! declares `inst u of B`. Instances of modules absent from the circuit get
//! no edge; they are kept in [`InstanceGraph::unresolved`].

use crate::circuit::Circuit;
use crate::stmt::Statement;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};
use std::collections::{HashMap, HashSet};

/// One step down the hierarchy: an instance name and the module it instantiates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceStep {
    /// The instance name in the parent module.
    pub instance: String,
    /// The instantiated module.
    pub module: String,
}

/// A chain of instances starting below `main`. The empty path denotes `main` itself.
pub type InstancePath = Vec<InstanceStep>;

/// Module → instantiated-module graph of a circuit.
pub struct InstanceGraph {
    graph: DiGraph<String, String>,
    nodes: HashMap<String, NodeIndex>,
    main: String,
    /// `(parent module, instance, missing module)` for instances of undefined modules.
    pub unresolved: Vec<(String, String, String)>,
}

impl InstanceGraph {
    /// Builds the graph of `circuit`. The first module of each name wins.
    pub fn new(circuit: &Circuit) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        for module in &circuit.modules {
            nodes
                .entry(module.name().to_string())
                .or_insert_with(|| graph.add_node(module.name().to_string()));
        }

        let mut unresolved = Vec::new();
        let mut seen = HashSet::new();
        for module in &circuit.modules {
            if !seen.insert(module.name()) {
                continue;
            }
            let Some(body) = module.body() else {
                continue;
            };
            let parent = nodes[module.name()];
            body.for_each_stmt(&mut |s| {
                if let Statement::DefInstance { name, module: child, .. } = s {
                    match nodes.get(child) {
                        Some(&c) => {
                            graph.add_edge(parent, c, name.clone());
                        }
                        None => unresolved.push((
                            module.name().to_string(),
                            name.clone(),
                            child.clone(),
                        )),
                    }
                }
            });
        }

        Self {
            graph,
            nodes,
            main: circuit.main.clone(),
            unresolved,
        }
    }

    /// The instances declared directly in `module`, in declaration order.
    pub fn children(&self, module: &str) -> Vec<InstanceStep> {
        let Some(&idx) = self.nodes.get(module) else {
            return Vec::new();
        };
        let mut steps: Vec<InstanceStep> = self
            .graph
            .edges(idx)
            .map(|e| InstanceStep {
                instance: e.weight().clone(),
                module: self.graph[e.target()].clone(),
            })
            .collect();
        // petgraph yields outgoing edges newest first
        steps.reverse();
        steps
    }

    /// Every module reachable from `main`, including `main`.
    pub fn reachable_modules(&self) -> HashSet<String> {
        let mut out = HashSet::new();
        let Some(&start) = self.nodes.get(&self.main) else {
            return out;
        };
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            out.insert(self.graph[idx].clone());
        }
        out
    }

    /// Every instance path from `main` down to an instance of `module`.
    ///
    /// `main` itself has the single empty path. Modules not reachable from
    /// `main` have none. Paths through an instance cycle are not followed
    /// around the cycle.
    pub fn instance_paths(&self, module: &str) -> Vec<InstancePath> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(&self.main) {
            return out;
        }
        let mut path = Vec::new();
        let mut on_path = HashSet::new();
        self.collect_paths(&self.main, module, &mut path, &mut on_path, &mut out);
        out
    }

    fn collect_paths(
        &self,
        current: &str,
        target: &str,
        path: &mut InstancePath,
        on_path: &mut HashSet<String>,
        out: &mut Vec<InstancePath>,
    ) {
        if current == target {
            out.push(path.clone());
        }
        if !on_path.insert(current.to_string()) {
            return;
        }
        for step in self.children(current) {
            if on_path.contains(&step.module) {
                continue;
            }
            let child = step.module.clone();
            path.push(step);
            self.collect_paths(&child, target, path, on_path, out);
            path.pop();
        }
        on_path.remove(current);
    }

    /// Returns the modules of some instance cycle, if the hierarchy has one.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        if !algo::is_cyclic_directed(&self.graph) {
            return None;
        }
        algo::tarjan_scc(&self.graph)
            .into_iter()
            .find(|scc| {
                scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0])
            })
            .map(|scc| {
                let mut names: Vec<String> =
                    scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                names.sort();
                names
            })
    }

    /// The name of the top module.
    pub fn main(&self) -> &str {
        &self.main
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::DefModule;

    fn module(name: &str, insts: &[(&str, &str)]) -> DefModule {
        DefModule::module(
            name,
            vec![],
            Statement::Block(
                insts
                    .iter()
                    .map(|(i, m)| Statement::instance(*i, *m))
                    .collect(),
            ),
        )
    }

    fn diamond() -> Circuit {
        Circuit::new(
            "Top",
            vec![
                module("Top", &[("a", "A"), ("b", "B")]),
                module("A", &[("leaf", "Leaf")]),
                module("B", &[("leaf", "Leaf")]),
                module("Leaf", &[]),
                module("Orphan", &[]),
            ],
        )
    }

    #[test]
    fn children_in_declaration_order() {
        let g = InstanceGraph::new(&diamond());
        let names: Vec<_> = g.children("Top").into_iter().map(|s| s.instance).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn paths_to_shared_leaf() {
        let g = InstanceGraph::new(&diamond());
        let paths = g.instance_paths("Leaf");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0][0].instance, "a");
        assert_eq!(paths[1][0].instance, "b");
        assert_eq!(g.instance_paths("Top"), vec![Vec::new()]);
        assert!(g.instance_paths("Orphan").is_empty());
    }

    #[test]
    fn reachability() {
        let g = InstanceGraph::new(&diamond());
        let reach = g.reachable_modules();
        assert!(reach.contains("Leaf"));
        assert!(!reach.contains("Orphan"));
        assert_eq!(g.find_cycle(), None);
    }

    #[test]
    fn detects_cycles() {
        let c = Circuit::new(
            "Top",
            vec![
                module("Top", &[("x", "X")]),
                module("X", &[("y", "Y")]),
                module("Y", &[("x", "X")]),
            ],
        );
        let g = InstanceGraph::new(&c);
        assert_eq!(g.find_cycle(), Some(vec!["X".to_string(), "Y".to_string()]));
        assert_eq!(g.instance_paths("Y").len(), 1);
    }

    #[test]
    fn self_instantiation_is_a_cycle() {
        let c = Circuit::new("Top", vec![module("Top", &[("me", "Top")])]);
        assert_eq!(InstanceGraph::new(&c).find_cycle(), Some(vec!["Top".to_string()]));
    }

    #[test]
    fn undefined_modules_are_recorded() {
        let c = Circuit::new("Top", vec![module("Top", &[("u", "Ghost")])]);
        let g = InstanceGraph::new(&c);
        assert_eq!(
            g.unresolved,
            vec![("Top".to_string(), "u".to_string(), "Ghost".to_string())]
        );
    }
}
