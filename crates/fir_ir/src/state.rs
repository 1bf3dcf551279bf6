//! What passes consume and produce.

use crate::annotation::Annotation;
use crate::circuit::Circuit;
use serde::{Deserialize, Serialize};

/// A circuit together with the annotations addressed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitState {
    /// The circuit.
    pub circuit: Circuit,
    /// Annotations not yet consumed by a pass.
    pub annotations: Vec<Annotation>,
}

impl CircuitState {
    /// Creates a state.
    pub fn new(circuit: Circuit, annotations: Vec<Annotation>) -> Self {
        Self {
            circuit,
            annotations,
        }
    }

    /// A state with no annotations.
    pub fn from_circuit(circuit: Circuit) -> Self {
        Self::new(circuit, Vec::new())
    }
}

/// A pass over a [`CircuitState`].
///
/// A transform never modifies its input. It either returns a complete new
/// state or fails without partial results.
pub trait Transform {
    /// The failure type.
    type Error: std::error::Error;

    /// A short name for logs.
    fn name(&self) -> &'static str;

    /// Runs the pass.
    fn execute(&self, state: &CircuitState) -> Result<CircuitState, Self::Error>;
}
