//! The circuit root.

use crate::module::DefModule;
use fir_source::Info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete circuit: a list of modules and the name of the top one.
///
/// Nothing is checked at construction; `main` may name no module, and module
/// names may repeat, until a validation pass has run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circuit {
    /// Where the circuit was declared.
    pub info: Info,
    /// Every module, in declaration order.
    pub modules: Vec<DefModule>,
    /// The name of the top-level module.
    pub main: String,
}

impl Circuit {
    /// Creates a circuit with no location.
    pub fn new(main: impl Into<String>, modules: Vec<DefModule>) -> Self {
        Self {
            info: Info::NoInfo,
            modules,
            main: main.into(),
        }
    }

    /// Returns the first module named `name`.
    pub fn module(&self, name: &str) -> Option<&DefModule> {
        self.modules.iter().find(|m| m.name() == name)
    }

    /// Returns the module named by `main`.
    pub fn main_module(&self) -> Option<&DefModule> {
        self.module(&self.main)
    }

    /// Returns every module name, in declaration order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(DefModule::name)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serialize::serialize_circuit(self))
    }
}
