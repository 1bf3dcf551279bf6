//! The wiring pass.
//!
//! Wiring connects a named component in one module to named components or
//! modules elsewhere in the hierarchy, without the designer routing ports by
//! hand. The directives arrive as [`Annotation`](fir_ir::Annotation)s on a
//! [`CircuitState`](fir_ir::CircuitState): one source and any number of
//! sinks per pin label. [`WiringTransform`] consumes them and returns a new
//! circuit with the ports and connections added.
//!
//! Failures are [`WiringError`]s; the pass never returns a partially wired
//! circuit.

#![warn(missing_docs)]

pub mod error;
pub mod resolve;
mod wiring;

pub use error::WiringError;
pub use resolve::{component_expr, component_type, is_declared, source_from_target};
pub use wiring::WiringTransform;
