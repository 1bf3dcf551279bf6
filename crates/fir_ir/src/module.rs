//! Module definitions.
//!
//! A circuit is a flat list of [`DefModule`]s that refer to each other by name
//! through instance statements. A defined module has ports and a body; an
//! external module has ports only.

use crate::port::{Direction, Port};
use crate::stmt::Statement;
use crate::types::{Field, Orientation, Type};
use fir_source::Info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A module of the circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefModule {
    /// A module defined in this circuit.
    Module {
        /// Where the module was declared.
        info: Info,
        /// The module name.
        name: String,
        /// The module's ports.
        ports: Vec<Port>,
        /// The module body.
        body: Statement,
    },
    /// A module implemented outside this circuit.
    ExtModule {
        /// Where the module was declared.
        info: Info,
        /// The module name.
        name: String,
        /// The module's ports.
        ports: Vec<Port>,
    },
}

impl DefModule {
    /// A defined module with no location.
    pub fn module(name: impl Into<String>, ports: Vec<Port>, body: Statement) -> Self {
        DefModule::Module {
            info: Info::NoInfo,
            name: name.into(),
            ports,
            body,
        }
    }

    /// An external module with no location.
    pub fn ext_module(name: impl Into<String>, ports: Vec<Port>) -> Self {
        DefModule::ExtModule {
            info: Info::NoInfo,
            name: name.into(),
            ports,
        }
    }

    /// The module name.
    pub fn name(&self) -> &str {
        match self {
            DefModule::Module { name, .. } | DefModule::ExtModule { name, .. } => name,
        }
    }

    /// Where the module was declared.
    pub fn info(&self) -> &Info {
        match self {
            DefModule::Module { info, .. } | DefModule::ExtModule { info, .. } => info,
        }
    }

    /// The module's ports.
    pub fn ports(&self) -> &[Port] {
        match self {
            DefModule::Module { ports, .. } | DefModule::ExtModule { ports, .. } => ports,
        }
    }

    /// The body of a defined module.
    pub fn body(&self) -> Option<&Statement> {
        match self {
            DefModule::Module { body, .. } => Some(body),
            DefModule::ExtModule { .. } => None,
        }
    }

    /// Returns `true` for external modules.
    pub fn is_external(&self) -> bool {
        matches!(self, DefModule::ExtModule { .. })
    }

    /// Looks a port up by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports().iter().find(|p| p.name == name)
    }

    /// The type of an instance of this module, seen from the instantiating module.
    ///
    /// Each port becomes a field; inputs are flipped because the parent drives them.
    pub fn instance_type(&self) -> Type {
        Type::Bundle(
            self.ports()
                .iter()
                .map(|p| Field {
                    name: p.name.clone(),
                    flip: match p.direction {
                        Direction::Output => Orientation::Default,
                        Direction::Input => Orientation::Flip,
                    },
                    tpe: p.tpe.clone(),
                })
                .collect(),
        )
    }
}

impl fmt::Display for DefModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serialize::serialize_module(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adder() -> DefModule {
        DefModule::module(
            "Adder",
            vec![Port::input("a", Type::uint(8)), Port::output("sum", Type::uint(9))],
            Statement::Block(vec![]),
        )
    }

    #[test]
    fn accessors() {
        let m = adder();
        assert_eq!(m.name(), "Adder");
        assert_eq!(m.ports().len(), 2);
        assert!(m.body().is_some());
        assert!(!m.is_external());
        assert_eq!(m.port("sum").map(|p| p.direction), Some(Direction::Output));
        assert!(m.port("carry").is_none());
    }

    #[test]
    fn ext_module_has_no_body() {
        let m = DefModule::ext_module("Blackbox", vec![Port::output("q", Type::Clock)]);
        assert!(m.is_external());
        assert!(m.body().is_none());
    }

    #[test]
    fn instance_type_flips_inputs() {
        let t = adder().instance_type();
        assert_eq!(t.field("a").map(|f| f.flip), Some(Orientation::Flip));
        assert_eq!(t.field("sum").map(|f| f.flip), Some(Orientation::Default));
    }
}
