//! Name resolution for wiring targets.
//!
//! Targets refer to the tree by name only. These helpers look the names up in
//! the circuit: whether a component's root is declared, what expression
//! denotes it inside its module, and what type it has.

use fir_common::FirResult;
use fir_ir::{
    Circuit, ComponentName, DefModule, Expression, PathElement, SourceAnnotation, Statement,
    Target, Type,
};

use crate::error::WiringError;

/// Builds a source directive from a target, rejecting module targets.
pub fn source_from_target(target: Target, pin: &str) -> Result<SourceAnnotation, WiringError> {
    match target {
        Target::Component(c) => Ok(SourceAnnotation::new(c, pin)),
        Target::Module(m) => Err(WiringError::SourceIsModule {
            pin: pin.to_string(),
            target: m,
        }),
    }
}

/// The port or declaration of `module` named `root`.
enum Root<'m> {
    Port(&'m Type),
    Decl(&'m Statement),
}

fn find_root<'m>(module: &'m DefModule, root: &str) -> Option<Root<'m>> {
    if let Some(port) = module.port(root) {
        return Some(Root::Port(&port.tpe));
    }
    let body = module.body()?;
    body.declarations()
        .into_iter()
        .find(|d| d.name() == Some(root))
        .map(Root::Decl)
}

/// Returns `true` if `root` is a port or declaration of `module`.
pub fn is_declared(module: &DefModule, root: &str) -> bool {
    find_root(module, root).is_some()
}

/// The expression that denotes `component` inside its module.
///
/// The expression is untyped, like parsed text.
pub fn component_expr(component: &ComponentName) -> FirResult<Expression> {
    let (root, path) = component.path()?;
    Ok(path
        .into_iter()
        .fold(Expression::untyped(root), |expr, elem| match elem {
            PathElement::Field(name) => Expression::SubField {
                expr: Box::new(expr),
                name,
                tpe: Type::Unknown,
            },
            PathElement::Index(value) => Expression::SubIndex {
                expr: Box::new(expr),
                value,
                tpe: Type::Unknown,
            },
        }))
}

/// The type of `component` in `module`, if it can be determined.
///
/// Ports, wires and registers have their declared type; an instance has the
/// bundle of its module's ports; a node has the type of its value. Memories
/// have none. The field path is then followed through bundles and vectors.
pub fn component_type(
    circuit: &Circuit,
    module: &DefModule,
    component: &ComponentName,
) -> FirResult<Option<Type>> {
    let (root, path) = component.path()?;
    let root_type = match find_root(module, &root) {
        None => return Ok(None),
        Some(Root::Port(tpe)) => Some(tpe.clone()),
        Some(Root::Decl(decl)) => match decl {
            Statement::DefWire { tpe, .. } | Statement::DefRegister { tpe, .. } => {
                Some(tpe.clone())
            }
            Statement::DefInstance { module, .. } => circuit.module(module).map(|m| m.instance_type()),
            Statement::DefNode { value, .. } => Some(value.tpe()),
            _ => None,
        },
    };
    Ok(root_type.and_then(|t| follow_path(t, &path)))
}

fn follow_path(mut tpe: Type, path: &[PathElement]) -> Option<Type> {
    for elem in path {
        tpe = match (elem, tpe) {
            (PathElement::Field(name), t @ Type::Bundle(_)) => t.field(name)?.tpe.clone(),
            (PathElement::Index(i), Type::Vector { tpe, size }) if *i < size => *tpe,
            _ => return None,
        };
    }
    Some(tpe)
}
