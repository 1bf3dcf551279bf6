//! The closed set of primitive operators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive operator tag.
///
/// Operators are applied through [`Expression::DoPrim`](crate::Expression::DoPrim)
/// with a list of expression arguments and a list of integer constants. The
/// number of each is fixed per tag, see [`PrimOp::arity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum PrimOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Leq,
    Gt,
    Geq,
    Eq,
    Neq,
    Pad,
    AsUInt,
    AsSInt,
    AsClock,
    Shl,
    Shr,
    Dshl,
    Dshr,
    Cvt,
    Neg,
    Not,
    And,
    Or,
    Xor,
    Andr,
    Orr,
    Xorr,
    Cat,
    Bits,
    Head,
    Tail,
}

/// Broad grouping of primitive operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpCategory {
    /// `add`, `sub`, `mul`, `div`, `rem`, `neg`, `cvt`.
    Arithmetic,
    /// `lt`, `leq`, `gt`, `geq`, `eq`, `neq`.
    Comparison,
    /// `and`, `or`, `xor`, `not`.
    Bitwise,
    /// `andr`, `orr`, `xorr`.
    Reduction,
    /// `shl`, `shr`, `dshl`, `dshr`.
    Shift,
    /// `asUInt`, `asSInt`, `asClock`.
    Cast,
    /// `pad`, `cat`, `bits`, `head`, `tail`.
    Structural,
}

impl PrimOp {
    /// Every operator, in declaration order.
    pub const ALL: [PrimOp; 32] = [
        PrimOp::Add,
        PrimOp::Sub,
        PrimOp::Mul,
        PrimOp::Div,
        PrimOp::Rem,
        PrimOp::Lt,
        PrimOp::Leq,
        PrimOp::Gt,
        PrimOp::Geq,
        PrimOp::Eq,
        PrimOp::Neq,
        PrimOp::Pad,
        PrimOp::AsUInt,
        PrimOp::AsSInt,
        PrimOp::AsClock,
        PrimOp::Shl,
        PrimOp::Shr,
        PrimOp::Dshl,
        PrimOp::Dshr,
        PrimOp::Cvt,
        PrimOp::Neg,
        PrimOp::Not,
        PrimOp::And,
        PrimOp::Or,
        PrimOp::Xor,
        PrimOp::Andr,
        PrimOp::Orr,
        PrimOp::Xorr,
        PrimOp::Cat,
        PrimOp::Bits,
        PrimOp::Head,
        PrimOp::Tail,
    ];

    /// The operator's name in the text syntax.
    pub fn name(self) -> &'static str {
        match self {
            PrimOp::Add => "add",
            PrimOp::Sub => "sub",
            PrimOp::Mul => "mul",
            PrimOp::Div => "div",
            PrimOp::Rem => "rem",
            PrimOp::Lt => "lt",
            PrimOp::Leq => "leq",
            PrimOp::Gt => "gt",
            PrimOp::Geq => "geq",
            PrimOp::Eq => "eq",
            PrimOp::Neq => "neq",
            PrimOp::Pad => "pad",
            PrimOp::AsUInt => "asUInt",
            PrimOp::AsSInt => "asSInt",
            PrimOp::AsClock => "asClock",
            PrimOp::Shl => "shl",
            PrimOp::Shr => "shr",
            PrimOp::Dshl => "dshl",
            PrimOp::Dshr => "dshr",
            PrimOp::Cvt => "cvt",
            PrimOp::Neg => "neg",
            PrimOp::Not => "not",
            PrimOp::And => "and",
            PrimOp::Or => "or",
            PrimOp::Xor => "xor",
            PrimOp::Andr => "andr",
            PrimOp::Orr => "orr",
            PrimOp::Xorr => "xorr",
            PrimOp::Cat => "cat",
            PrimOp::Bits => "bits",
            PrimOp::Head => "head",
            PrimOp::Tail => "tail",
        }
    }

    /// Looks an operator up by its text name.
    pub fn from_name(name: &str) -> Option<PrimOp> {
        PrimOp::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// The number of expression arguments and integer constants the operator takes.
    pub fn arity(self) -> (usize, usize) {
        match self {
            PrimOp::Add
            | PrimOp::Sub
            | PrimOp::Mul
            | PrimOp::Div
            | PrimOp::Rem
            | PrimOp::Lt
            | PrimOp::Leq
            | PrimOp::Gt
            | PrimOp::Geq
            | PrimOp::Eq
            | PrimOp::Neq
            | PrimOp::Dshl
            | PrimOp::Dshr
            | PrimOp::And
            | PrimOp::Or
            | PrimOp::Xor
            | PrimOp::Cat => (2, 0),
            PrimOp::AsUInt
            | PrimOp::AsSInt
            | PrimOp::AsClock
            | PrimOp::Cvt
            | PrimOp::Neg
            | PrimOp::Not
            | PrimOp::Andr
            | PrimOp::Orr
            | PrimOp::Xorr => (1, 0),
            PrimOp::Pad | PrimOp::Shl | PrimOp::Shr | PrimOp::Head | PrimOp::Tail => (1, 1),
            PrimOp::Bits => (1, 2),
        }
    }

    /// The operator's category.
    pub fn category(self) -> OpCategory {
        match self {
            PrimOp::Add
            | PrimOp::Sub
            | PrimOp::Mul
            | PrimOp::Div
            | PrimOp::Rem
            | PrimOp::Neg
            | PrimOp::Cvt => OpCategory::Arithmetic,
            PrimOp::Lt | PrimOp::Leq | PrimOp::Gt | PrimOp::Geq | PrimOp::Eq | PrimOp::Neq => {
                OpCategory::Comparison
            }
            PrimOp::And | PrimOp::Or | PrimOp::Xor | PrimOp::Not => OpCategory::Bitwise,
            PrimOp::Andr | PrimOp::Orr | PrimOp::Xorr => OpCategory::Reduction,
            PrimOp::Shl | PrimOp::Shr | PrimOp::Dshl | PrimOp::Dshr => OpCategory::Shift,
            PrimOp::AsUInt | PrimOp::AsSInt | PrimOp::AsClock => OpCategory::Cast,
            PrimOp::Pad | PrimOp::Cat | PrimOp::Bits | PrimOp::Head | PrimOp::Tail => {
                OpCategory::Structural
            }
        }
    }
}

impl fmt::Display for PrimOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
