//! The statement grammar.

use crate::expr::Expression;
use crate::types::Type;
use fir_source::Info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A statement in a module body.
///
/// Declarations (`DefWire`, `DefRegister`, `DefInstance`, `DefMemory`,
/// `DefNode`) carry a name and an [`Info`]. Structural statements carry no
/// name. Declared names are identifiers: a letter, `_` or `$` followed by
/// letters, digits, `_` or `$`. The text syntax has no spelling for others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    /// A combinational wire.
    DefWire {
        /// Where the wire was declared.
        info: Info,
        /// The wire name.
        name: String,
        /// The wire type.
        tpe: Type,
    },
    /// A clocked register with synchronous reset.
    DefRegister {
        /// Where the register was declared.
        info: Info,
        /// The register name.
        name: String,
        /// The register type.
        tpe: Type,
        /// The clock.
        clock: Expression,
        /// The reset condition.
        reset: Expression,
        /// The value loaded on reset.
        init: Expression,
    },
    /// An instance of another module.
    DefInstance {
        /// Where the instance was declared.
        info: Info,
        /// The instance name.
        name: String,
        /// The instantiated module's name.
        module: String,
    },
    /// A memory with named read, write and read-write ports.
    DefMemory {
        /// Where the memory was declared.
        info: Info,
        /// The memory name.
        name: String,
        /// The element type.
        data_type: Type,
        /// The number of elements.
        depth: u64,
        /// Cycles from write enable to the data being stored.
        write_latency: u64,
        /// Cycles from read address to read data.
        read_latency: u64,
        /// Read port names.
        readers: Vec<String>,
        /// Write port names.
        writers: Vec<String>,
        /// Read-write port names.
        readwriters: Vec<String>,
    },
    /// A named intermediate value.
    DefNode {
        /// Where the node was declared.
        info: Info,
        /// The node name.
        name: String,
        /// The node's value.
        value: Expression,
    },
    /// A conditional with two branches; either may be empty.
    Conditionally {
        /// Where the condition appears.
        info: Info,
        /// The one-bit predicate.
        pred: Expression,
        /// Taken when the predicate is high.
        conseq: Box<Statement>,
        /// Taken when the predicate is low.
        alt: Box<Statement>,
    },
    /// An ordered sequence of statements.
    Block(Vec<Statement>),
    /// Connects fields present on both sides, by name.
    PartialConnect {
        /// Where the connection appears.
        info: Info,
        /// The sink.
        loc: Expression,
        /// The source.
        expr: Expression,
    },
    /// Drives `loc` from `expr`.
    Connect {
        /// Where the connection appears.
        info: Info,
        /// The sink.
        loc: Expression,
        /// The source.
        expr: Expression,
    },
    /// Marks every sink element of `expr` as deliberately undriven.
    IsInvalid {
        /// Where the statement appears.
        info: Info,
        /// The invalidated expression.
        expr: Expression,
    },
    /// Halts simulation with `ret` when `en` is high on a clock edge.
    Stop {
        /// Where the statement appears.
        info: Info,
        /// Return code.
        ret: i32,
        /// The clock.
        clk: Expression,
        /// The enable.
        en: Expression,
    },
    /// Prints formatted text when `en` is high on a clock edge.
    Print {
        /// Where the statement appears.
        info: Info,
        /// The literal format string.
        string: String,
        /// Values substituted into the format.
        args: Vec<Expression>,
        /// The clock.
        clk: Expression,
        /// The enable.
        en: Expression,
    },
    /// The empty statement.
    Empty,
}

impl Statement {
    /// A wire with no location.
    pub fn wire(name: impl Into<String>, tpe: Type) -> Self {
        Statement::DefWire {
            info: Info::NoInfo,
            name: name.into(),
            tpe,
        }
    }

    /// A node with no location.
    pub fn node(name: impl Into<String>, value: Expression) -> Self {
        Statement::DefNode {
            info: Info::NoInfo,
            name: name.into(),
            value,
        }
    }

    /// An instance with no location.
    pub fn instance(name: impl Into<String>, module: impl Into<String>) -> Self {
        Statement::DefInstance {
            info: Info::NoInfo,
            name: name.into(),
            module: module.into(),
        }
    }

    /// A connection with no location.
    pub fn connect(loc: Expression, expr: Expression) -> Self {
        Statement::Connect {
            info: Info::NoInfo,
            loc,
            expr,
        }
    }

    /// A conditional with no location.
    pub fn when(pred: Expression, conseq: Statement, alt: Statement) -> Self {
        Statement::Conditionally {
            info: Info::NoInfo,
            pred,
            conseq: Box::new(conseq),
            alt: Box::new(alt),
        }
    }

    /// The declared name, for declarations.
    pub fn name(&self) -> Option<&str> {
        match self {
            Statement::DefWire { name, .. }
            | Statement::DefRegister { name, .. }
            | Statement::DefInstance { name, .. }
            | Statement::DefMemory { name, .. }
            | Statement::DefNode { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns `true` for the five declaration variants.
    pub fn is_declaration(&self) -> bool {
        self.name().is_some()
    }

    /// The statement's location. `Block` and `Empty` have none.
    pub fn info(&self) -> &Info {
        static NONE: Info = Info::NoInfo;
        match self {
            Statement::DefWire { info, .. }
            | Statement::DefRegister { info, .. }
            | Statement::DefInstance { info, .. }
            | Statement::DefMemory { info, .. }
            | Statement::DefNode { info, .. }
            | Statement::Conditionally { info, .. }
            | Statement::PartialConnect { info, .. }
            | Statement::Connect { info, .. }
            | Statement::IsInvalid { info, .. }
            | Statement::Stop { info, .. }
            | Statement::Print { info, .. } => info,
            Statement::Block(_) | Statement::Empty => &NONE,
        }
    }

    /// Returns `true` for `Empty` and for blocks holding only empty statements.
    pub fn is_empty(&self) -> bool {
        match self {
            Statement::Empty => true,
            Statement::Block(stmts) => stmts.iter().all(Statement::is_empty),
            _ => false,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serialize::serialize_statement(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::width::Width;

    #[test]
    fn declaration_names() {
        assert_eq!(Statement::wire("w", Type::uint(1)).name(), Some("w"));
        assert_eq!(Statement::instance("u", "Sub").name(), Some("u"));
        let c = Statement::connect(Expression::untyped("a"), Expression::untyped("b"));
        assert_eq!(c.name(), None);
        assert!(!c.is_declaration());
        assert!(Statement::node("n", Expression::uint(0, Width::known(1))).is_declaration());
    }

    #[test]
    fn info_of_structural_statements() {
        assert!(Statement::Empty.info().is_none());
        assert!(Statement::Block(vec![]).info().is_none());
        let w = Statement::DefWire {
            info: Info::new("a.fir 2:3"),
            name: "w".into(),
            tpe: Type::Clock,
        };
        assert_eq!(w.info().text(), Some("a.fir 2:3"));
    }

    #[test]
    fn emptiness() {
        assert!(Statement::Empty.is_empty());
        assert!(Statement::Block(vec![Statement::Empty, Statement::Block(vec![])]).is_empty());
        assert!(!Statement::Block(vec![Statement::wire("w", Type::Clock)]).is_empty());
    }
}
