//! Shared foundational types used across the FIR circuit toolkit.
//!
//! This crate provides the generic IR error raised when a structural defect
//! is detected, and the [`Namespace`] used by passes to mint fresh names that
//! never collide with names already declared in a module.

#![warn(missing_docs)]

pub mod namespace;
pub mod result;

pub use namespace::Namespace;
pub use result::{FirResult, IrError};
