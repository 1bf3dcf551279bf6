//! All built-in check rule implementations.
//!
//! This module re-exports all individual rule types and provides
//! `register_builtin_rules` to add all 13 rules to a `CheckEngine`.

mod e101;
mod e102;
mod e103;
mod e104;
mod e105;
mod e106;
mod e107;
mod e108;
mod e109;
mod e110;
mod e111;
mod w101;
mod w102;

pub use e101::MainNotFound;
pub use e102::DuplicateModule;
pub use e103::DuplicatePort;
pub use e104::DuplicateField;
pub use e105::DuplicateDeclaration;
pub use e106::UndefinedModule;
pub use e107::PrimOpArity;
pub use e108::MalformedLiteral;
pub use e109::NegativeWidth;
pub use e110::RecursiveInstance;
pub use e111::InvalidMemory;
pub use w101::UnknownType;
pub use w102::UnreachableModule;

use crate::CheckEngine;

/// Registers all 13 built-in check rules with the engine.
///
/// This adds rules E101-E111 and W101-W102.
pub fn register_builtin_rules(engine: &mut CheckEngine) {
    engine.register(Box::new(MainNotFound));
    engine.register(Box::new(DuplicateModule));
    engine.register(Box::new(DuplicatePort));
    engine.register(Box::new(DuplicateField));
    engine.register(Box::new(DuplicateDeclaration));
    engine.register(Box::new(UndefinedModule));
    engine.register(Box::new(PrimOpArity));
    engine.register(Box::new(MalformedLiteral));
    engine.register(Box::new(NegativeWidth));
    engine.register(Box::new(RecursiveInstance));
    engine.register(Box::new(InvalidMemory));
    engine.register(Box::new(UnknownType));
    engine.register(Box::new(UnreachableModule));
}
