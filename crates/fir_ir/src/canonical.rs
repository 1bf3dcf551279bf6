//! Canonical form: the tree shape the text syntax can represent.
//!
//! Text has no way to spell a nested block, a typed reference, or an empty
//! `else`, so several trees print identically. Canonicalization picks one
//! representative per printed text:
//!
//! * module bodies and `when` consequents are flat `Block`s without `Empty`;
//! * an `else` branch is `Empty`, a `Conditionally`, or a non-empty `Block`;
//! * expressions other than literals have type [`Type::Unknown`].
//!
//! Parsing the serialization of any circuit yields its canonical form.

use crate::circuit::Circuit;
use crate::expr::Expression;
use crate::module::DefModule;
use crate::stmt::Statement;
use crate::types::Type;

impl Circuit {
    /// Returns the canonical form of this circuit.
    pub fn canonical(&self) -> Circuit {
        Circuit {
            info: self.info.clone(),
            modules: self.modules.iter().map(DefModule::canonical).collect(),
            main: self.main.clone(),
        }
    }
}

impl DefModule {
    /// Returns the canonical form of this module.
    pub fn canonical(&self) -> DefModule {
        match self {
            DefModule::Module {
                info,
                name,
                ports,
                body,
            } => DefModule::Module {
                info: info.clone(),
                name: name.clone(),
                ports: ports.clone(),
                body: canonical_block(body),
            },
            ext @ DefModule::ExtModule { .. } => ext.clone(),
        }
    }
}

impl Statement {
    /// Returns the canonical form of this statement as it appears inside a block.
    ///
    /// Blocks are flattened and `Empty` is dropped, so the result is a `Block`.
    pub fn canonical(&self) -> Statement {
        canonical_block(self)
    }
}

impl Expression {
    /// Returns this expression with every non-literal type erased.
    pub fn erase_types(self) -> Expression {
        self.with_tpe(Type::Unknown)
            .map_expr(&mut Expression::erase_types)
    }
}

fn canonical_block(stmt: &Statement) -> Statement {
    let mut stmts = Vec::new();
    flatten_into(stmt, &mut stmts);
    Statement::Block(stmts)
}

fn flatten_into(stmt: &Statement, out: &mut Vec<Statement>) {
    match stmt {
        Statement::Block(stmts) => {
            for s in stmts {
                flatten_into(s, out);
            }
        }
        Statement::Empty => {}
        Statement::Conditionally {
            info,
            pred,
            conseq,
            alt,
        } => out.push(Statement::Conditionally {
            info: info.clone(),
            pred: pred.clone().erase_types(),
            conseq: Box::new(canonical_block(conseq)),
            alt: Box::new(canonical_alt(alt)),
        }),
        other => out.push(other.clone().map_expr(&mut Expression::erase_types)),
    }
}

fn canonical_alt(alt: &Statement) -> Statement {
    if let Statement::Conditionally { .. } = alt {
        let mut one = Vec::with_capacity(1);
        flatten_into(alt, &mut one);
        return one.pop().unwrap_or(Statement::Empty);
    }
    match canonical_block(alt) {
        Statement::Block(stmts) if stmts.is_empty() => Statement::Empty,
        block => block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Port;
    use crate::primop::PrimOp;
    use crate::width::Width;

    #[test]
    fn nested_blocks_flatten() {
        let s = Statement::Block(vec![
            Statement::Empty,
            Statement::Block(vec![Statement::wire("a", Type::Clock), Statement::Block(vec![])]),
            Statement::wire("b", Type::Clock),
        ]);
        assert_eq!(
            s.canonical(),
            Statement::Block(vec![
                Statement::wire("a", Type::Clock),
                Statement::wire("b", Type::Clock)
            ])
        );
    }

    #[test]
    fn single_statement_body_becomes_block() {
        let m = DefModule::module("M", vec![], Statement::wire("w", Type::Clock)).canonical();
        assert_eq!(
            m.body(),
            Some(&Statement::Block(vec![Statement::wire("w", Type::Clock)]))
        );
    }

    #[test]
    fn conditional_branches() {
        let s = Statement::when(
            Expression::reference("c", Type::uint(1)),
            Statement::Empty,
            Statement::Block(vec![Statement::Empty]),
        );
        let expected = Statement::Block(vec![Statement::when(
            Expression::untyped("c"),
            Statement::Block(vec![]),
            Statement::Empty,
        )]);
        assert_eq!(s.canonical(), expected);
    }

    #[test]
    fn else_when_stays_a_conditional() {
        let inner = Statement::when(Expression::untyped("d"), Statement::Empty, Statement::Empty);
        let s = Statement::when(Expression::untyped("c"), Statement::Empty, inner);
        let Statement::Block(stmts) = s.canonical() else {
            panic!("not a block");
        };
        let Statement::Conditionally { alt, .. } = &stmts[0] else {
            panic!("not a conditional");
        };
        assert!(matches!(alt.as_ref(), Statement::Conditionally { .. }));
    }

    #[test]
    fn expression_types_are_erased_except_literals() {
        let e = Expression::DoPrim {
            op: PrimOp::Add,
            args: vec![
                Expression::reference("a", Type::uint(8)),
                Expression::uint(1, Width::known(8)),
            ],
            consts: vec![],
            tpe: Type::uint(9),
        };
        assert_eq!(
            e.erase_types(),
            Expression::prim(
                PrimOp::Add,
                vec![Expression::untyped("a"), Expression::uint(1, Width::known(8))],
                vec![]
            )
        );
    }

    #[test]
    fn ports_and_declared_types_are_kept() {
        let m = DefModule::module(
            "M",
            vec![Port::input("a", Type::uint(8))],
            Statement::Block(vec![Statement::wire("w", Type::uint(8))]),
        );
        assert_eq!(m.canonical(), m);
    }
}
