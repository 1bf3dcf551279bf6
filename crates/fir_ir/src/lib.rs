//! The FIR intermediate representation.
//!
//! A closed grammar of typed circuit elements: [`Width`]s and their algebra,
//! [`PrimOp`]s, [`Type`]s, [`Expression`]s, [`Statement`]s, [`DefModule`]s
//! and the [`Circuit`] root. Trees are plain immutable values. Passes read
//! them freely and rewrite them by building new trees.
//!
//! Around the grammar sit the canonical text [`serialize`]r, the
//! [`InstanceGraph`] of the module hierarchy, and the [`Annotation`]s that
//! address parts of a circuit by name for passes such as wiring.

#![warn(missing_docs)]

pub mod annotation;
pub mod canonical;
pub mod circuit;
pub mod expr;
pub mod instance_graph;
pub mod module;
pub mod port;
pub mod primop;
pub mod serialize;
pub mod state;
pub mod stmt;
pub mod traverse;
pub mod types;
pub mod width;

pub use annotation::{
    Annotation, ComponentName, PathElement, SinkAnnotation, SourceAnnotation, Target,
};
pub use circuit::Circuit;
pub use expr::Expression;
pub use instance_graph::{InstanceGraph, InstancePath, InstanceStep};
pub use module::DefModule;
pub use port::{Direction, Port};
pub use primop::{OpCategory, PrimOp};
pub use serialize::{
    serialize_circuit, serialize_expression, serialize_module, serialize_statement,
    serialize_type, serialize_width,
};
pub use state::{CircuitState, Transform};
pub use stmt::Statement;
pub use types::{Field, Orientation, Type};
pub use width::Width;

pub use fir_source::Info;
pub use num_bigint::BigInt;
