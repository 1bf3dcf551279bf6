//! Diagnostic creation, severity management, and rendering.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels,
//! codes, located labels, notes, and help text. The thread-safe
//! [`DiagnosticSink`] accumulates diagnostics while parsing and checking, and
//! [`DiagnosticRenderer`] implementations format them for a terminal or as JSON.
//!
//! Locations are [`Info`](fir_source::Info) values, the same provenance tags
//! the IR carries, so a finding about a node points wherever the node came from.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
