//! Ports on module interfaces.

use crate::types::Type;
use fir_source::Info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The direction of a port on a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Data flows into the module.
    Input,
    /// Data flows out of the module.
    Output,
}

impl Direction {
    /// The opposite direction.
    pub fn flip(self) -> Direction {
        match self {
            Direction::Input => Direction::Output,
            Direction::Output => Direction::Input,
        }
    }

    /// The keyword used in the text syntax.
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A port in a module's external interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    /// Where the port was declared.
    pub info: Info,
    /// The port name, unique within its module. An identifier, as for
    /// declarations.
    pub name: String,
    /// The direction of data flow.
    pub direction: Direction,
    /// The port type.
    pub tpe: Type,
}

impl Port {
    /// Creates a port with no location.
    pub fn new(name: impl Into<String>, direction: Direction, tpe: Type) -> Self {
        Self {
            info: Info::NoInfo,
            name: name.into(),
            direction,
            tpe,
        }
    }

    /// Creates an input port with no location.
    pub fn input(name: impl Into<String>, tpe: Type) -> Self {
        Self::new(name, Direction::Input, tpe)
    }

    /// Creates an output port with no location.
    pub fn output(name: impl Into<String>, tpe: Type) -> Self {
        Self::new(name, Direction::Output, tpe)
    }

    /// Replaces the port's location.
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }
}
