//! IR traversal helpers used by multiple check rules.

use std::collections::HashSet;

use fir_ir::{DefModule, Expression, Statement, Type};

/// The type a declaration introduces, if it states one.
///
/// Wires and registers carry their type, memories their data type. Nodes
/// take the type of their value and instances the ports of their module, so
/// neither states a type of its own.
pub fn declared_type(stmt: &Statement) -> Option<&Type> {
    match stmt {
        Statement::DefWire { tpe, .. } | Statement::DefRegister { tpe, .. } => Some(tpe),
        Statement::DefMemory { data_type, .. } => Some(data_type),
        _ => None,
    }
}

/// Visits every expression in a module body, with the statement holding it.
///
/// Sub-expressions are visited too, pre-order. External modules have none.
pub fn for_each_module_expr<F: FnMut(&Expression, &Statement)>(module: &DefModule, f: &mut F) {
    let Some(body) = module.body() else {
        return;
    };
    body.for_each_stmt(&mut |stmt| {
        stmt.for_each_expr(&mut |root| root.for_each_expr(&mut |e| f(e, stmt)));
    });
}

/// The names occurring more than once, in the order of their second occurrence.
///
/// Each repeated name is returned once, together with the index of its
/// first and second occurrence.
pub fn duplicates<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize, usize)> {
    let mut first = std::collections::HashMap::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for (i, name) in names.into_iter().enumerate() {
        match first.get(name) {
            None => {
                first.insert(name, i);
            }
            Some(&j) => {
                if reported.insert(name) {
                    out.push((name, j, i));
                }
            }
        }
    }
    out
}
