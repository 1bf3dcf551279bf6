//! The expression grammar.
//!
//! Every expression node carries the [`Type`] it resolves to. Literals derive
//! theirs from their width; every other variant stores it, with
//! [`Type::Unknown`] standing in until type inference has run.

use crate::primop::PrimOp;
use crate::types::Type;
use crate::width::Width;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    /// A named port, declaration or instance.
    Reference {
        /// The referenced name.
        name: String,
        /// The resolved type.
        tpe: Type,
    },
    /// A bundle field access, `expr.name`.
    SubField {
        /// The bundle-typed operand.
        expr: Box<Expression>,
        /// The field name.
        name: String,
        /// The resolved type.
        tpe: Type,
    },
    /// A constant vector index, `expr[value]`.
    SubIndex {
        /// The vector-typed operand.
        expr: Box<Expression>,
        /// The element index.
        value: usize,
        /// The resolved type.
        tpe: Type,
    },
    /// A dynamic vector index, `expr[index]`.
    SubAccess {
        /// The vector-typed operand.
        expr: Box<Expression>,
        /// The index expression.
        index: Box<Expression>,
        /// The resolved type.
        tpe: Type,
    },
    /// Two-way selection.
    Mux {
        /// The one-bit condition.
        cond: Box<Expression>,
        /// Selected when the condition is high.
        tval: Box<Expression>,
        /// Selected when the condition is low.
        fval: Box<Expression>,
        /// The resolved type.
        tpe: Type,
    },
    /// A value that is only defined while `cond` is high.
    ValidIf {
        /// The one-bit condition.
        cond: Box<Expression>,
        /// The guarded value.
        value: Box<Expression>,
        /// The resolved type.
        tpe: Type,
    },
    /// An unsigned literal.
    UIntLiteral {
        /// The value; non-negative in a valid circuit.
        value: BigInt,
        /// The declared width.
        width: Width,
    },
    /// A signed literal.
    SIntLiteral {
        /// The value.
        value: BigInt,
        /// The declared width.
        width: Width,
    },
    /// Application of a primitive operator.
    DoPrim {
        /// The operator.
        op: PrimOp,
        /// Expression arguments.
        args: Vec<Expression>,
        /// Integer constant arguments.
        consts: Vec<BigInt>,
        /// The resolved type.
        tpe: Type,
    },
}

impl Expression {
    /// A reference of the given type.
    pub fn reference(name: impl Into<String>, tpe: Type) -> Self {
        Expression::Reference {
            name: name.into(),
            tpe,
        }
    }

    /// A reference whose type is not yet known.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::reference(name, Type::Unknown)
    }

    /// Accesses field `name` of `self`, typing the result from the bundle type when known.
    pub fn field(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let tpe = self
            .tpe()
            .field(&name)
            .map(|f| f.tpe.clone())
            .unwrap_or(Type::Unknown);
        Expression::SubField {
            expr: Box::new(self),
            name,
            tpe,
        }
    }

    /// Indexes `self` with a constant, typing the result from the vector type when known.
    pub fn index(self, value: usize) -> Self {
        let tpe = self.tpe().element().cloned().unwrap_or(Type::Unknown);
        Expression::SubIndex {
            expr: Box::new(self),
            value,
            tpe,
        }
    }

    /// Indexes `self` with a dynamic index.
    pub fn access(self, index: Expression) -> Self {
        let tpe = self.tpe().element().cloned().unwrap_or(Type::Unknown);
        Expression::SubAccess {
            expr: Box::new(self),
            index: Box::new(index),
            tpe,
        }
    }

    /// A multiplexer of unknown result type.
    pub fn mux(cond: Expression, tval: Expression, fval: Expression) -> Self {
        Expression::Mux {
            cond: Box::new(cond),
            tval: Box::new(tval),
            fval: Box::new(fval),
            tpe: Type::Unknown,
        }
    }

    /// A conditionally valid value of unknown result type.
    pub fn valid_if(cond: Expression, value: Expression) -> Self {
        Expression::ValidIf {
            cond: Box::new(cond),
            value: Box::new(value),
            tpe: Type::Unknown,
        }
    }

    /// An unsigned literal.
    pub fn uint(value: impl Into<BigInt>, width: Width) -> Self {
        Expression::UIntLiteral {
            value: value.into(),
            width,
        }
    }

    /// A signed literal.
    pub fn sint(value: impl Into<BigInt>, width: Width) -> Self {
        Expression::SIntLiteral {
            value: value.into(),
            width,
        }
    }

    /// A primitive operation of unknown result type.
    pub fn prim(op: PrimOp, args: Vec<Expression>, consts: Vec<BigInt>) -> Self {
        Expression::DoPrim {
            op,
            args,
            consts,
            tpe: Type::Unknown,
        }
    }

    /// The type this expression resolves to.
    pub fn tpe(&self) -> Type {
        match self {
            Expression::Reference { tpe, .. }
            | Expression::SubField { tpe, .. }
            | Expression::SubIndex { tpe, .. }
            | Expression::SubAccess { tpe, .. }
            | Expression::Mux { tpe, .. }
            | Expression::ValidIf { tpe, .. }
            | Expression::DoPrim { tpe, .. } => tpe.clone(),
            Expression::UIntLiteral { width, .. } => Type::UInt(width.clone()),
            Expression::SIntLiteral { width, .. } => Type::SInt(width.clone()),
        }
    }

    /// Replaces the stored type. Literals are returned unchanged.
    pub fn with_tpe(self, new: Type) -> Self {
        match self {
            Expression::Reference { name, .. } => Expression::Reference { name, tpe: new },
            Expression::SubField { expr, name, .. } => Expression::SubField {
                expr,
                name,
                tpe: new,
            },
            Expression::SubIndex { expr, value, .. } => Expression::SubIndex {
                expr,
                value,
                tpe: new,
            },
            Expression::SubAccess { expr, index, .. } => Expression::SubAccess {
                expr,
                index,
                tpe: new,
            },
            Expression::Mux {
                cond, tval, fval, ..
            } => Expression::Mux {
                cond,
                tval,
                fval,
                tpe: new,
            },
            Expression::ValidIf { cond, value, .. } => Expression::ValidIf {
                cond,
                value,
                tpe: new,
            },
            Expression::DoPrim {
                op, args, consts, ..
            } => Expression::DoPrim {
                op,
                args,
                consts,
                tpe: new,
            },
            lit @ (Expression::UIntLiteral { .. } | Expression::SIntLiteral { .. }) => lit,
        }
    }

    /// Returns `true` for literals.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::UIntLiteral { .. } | Expression::SIntLiteral { .. }
        )
    }

    /// The name at the root of a reference chain (`a` in `a.b[2].c`).
    ///
    /// `None` for expressions that are not built from a reference by field
    /// and index accesses.
    pub fn root_name(&self) -> Option<&str> {
        match self {
            Expression::Reference { name, .. } => Some(name),
            Expression::SubField { expr, .. }
            | Expression::SubIndex { expr, .. }
            | Expression::SubAccess { expr, .. } => expr.root_name(),
            _ => None,
        }
    }

    /// Returns `false` if this is a literal whose value cannot be represented
    /// in its known width.
    ///
    /// Non-literals and literals of unknown width always fit. A negative
    /// unsigned literal never fits. A negative known width fits nothing.
    pub fn literal_fits(&self) -> bool {
        match self {
            Expression::UIntLiteral { value, width } => {
                if value.is_negative() {
                    return false;
                }
                match width.value() {
                    Some(w) if w.is_negative() => false,
                    Some(w) => value.bits() <= bits_of(w),
                    None => true,
                }
            }
            Expression::SIntLiteral { value, width } => match width.value() {
                Some(w) if w.is_negative() => false,
                Some(w) if w.is_zero() => value.is_zero(),
                Some(w) => {
                    let (w, b) = (bits_of(w), value.bits());
                    if b != w {
                        return b < w;
                    }
                    // Only -2^(w-1) has as many magnitude bits as the width.
                    value.is_negative() && value.magnitude().trailing_zeros() == Some(b - 1)
                }
                None => true,
            },
            _ => true,
        }
    }
}

fn bits_of(width: &BigInt) -> u64 {
    num_traits::ToPrimitive::to_u64(width).unwrap_or(u64::MAX)
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serialize::serialize_expression(self))
    }
}
