//! Walking and rewriting IR trees.
//!
//! `for_each_*` visits nodes read-only. `map_*` rebuilds a node from its
//! immediate children, leaving the original untouched; recursion is up to
//! the closure.

use crate::expr::Expression;
use crate::stmt::Statement;

impl Statement {
    /// Visits this statement and every statement nested in it, pre-order.
    pub fn for_each_stmt<F: FnMut(&Statement)>(&self, f: &mut F) {
        f(self);
        match self {
            Statement::Block(stmts) => {
                for s in stmts {
                    s.for_each_stmt(f);
                }
            }
            Statement::Conditionally { conseq, alt, .. } => {
                conseq.for_each_stmt(f);
                alt.for_each_stmt(f);
            }
            _ => {}
        }
    }

    /// Visits the expressions held directly by this statement.
    ///
    /// Nested statements are not entered; combine with [`Statement::for_each_stmt`]
    /// to reach every expression of a body.
    pub fn for_each_expr<F: FnMut(&Expression)>(&self, f: &mut F) {
        match self {
            Statement::DefRegister {
                clock, reset, init, ..
            } => {
                f(clock);
                f(reset);
                f(init);
            }
            Statement::DefNode { value, .. } => f(value),
            Statement::Conditionally { pred, .. } => f(pred),
            Statement::PartialConnect { loc, expr, .. } | Statement::Connect { loc, expr, .. } => {
                f(loc);
                f(expr);
            }
            Statement::IsInvalid { expr, .. } => f(expr),
            Statement::Stop { clk, en, .. } => {
                f(clk);
                f(en);
            }
            Statement::Print { args, clk, en, .. } => {
                f(clk);
                f(en);
                for a in args {
                    f(a);
                }
            }
            Statement::DefWire { .. }
            | Statement::DefInstance { .. }
            | Statement::DefMemory { .. }
            | Statement::Block(_)
            | Statement::Empty => {}
        }
    }

    /// Every declaration in this statement, at any depth, in order.
    pub fn declarations(&self) -> Vec<&Statement> {
        let mut out = Vec::new();
        collect_declarations(self, &mut out);
        out
    }

    /// Rebuilds this statement with `f` applied to each immediately nested statement.
    pub fn map_stmt<F: FnMut(Statement) -> Statement>(self, f: &mut F) -> Statement {
        match self {
            Statement::Block(stmts) => Statement::Block(stmts.into_iter().map(&mut *f).collect()),
            Statement::Conditionally {
                info,
                pred,
                conseq,
                alt,
            } => Statement::Conditionally {
                info,
                pred,
                conseq: Box::new(f(*conseq)),
                alt: Box::new(f(*alt)),
            },
            other => other,
        }
    }

    /// Rebuilds this statement with `f` applied to each expression it holds directly.
    pub fn map_expr<F: FnMut(Expression) -> Expression>(self, f: &mut F) -> Statement {
        match self {
            Statement::DefRegister {
                info,
                name,
                tpe,
                clock,
                reset,
                init,
            } => Statement::DefRegister {
                info,
                name,
                tpe,
                clock: f(clock),
                reset: f(reset),
                init: f(init),
            },
            Statement::DefNode { info, name, value } => Statement::DefNode {
                info,
                name,
                value: f(value),
            },
            Statement::Conditionally {
                info,
                pred,
                conseq,
                alt,
            } => Statement::Conditionally {
                info,
                pred: f(pred),
                conseq,
                alt,
            },
            Statement::PartialConnect { info, loc, expr } => Statement::PartialConnect {
                info,
                loc: f(loc),
                expr: f(expr),
            },
            Statement::Connect { info, loc, expr } => Statement::Connect {
                info,
                loc: f(loc),
                expr: f(expr),
            },
            Statement::IsInvalid { info, expr } => Statement::IsInvalid {
                info,
                expr: f(expr),
            },
            Statement::Stop { info, ret, clk, en } => Statement::Stop {
                info,
                ret,
                clk: f(clk),
                en: f(en),
            },
            Statement::Print {
                info,
                string,
                args,
                clk,
                en,
            } => {
                let clk = f(clk);
                let en = f(en);
                Statement::Print {
                    info,
                    string,
                    args: args.into_iter().map(&mut *f).collect(),
                    clk,
                    en,
                }
            }
            other => other,
        }
    }
}

fn collect_declarations<'a>(stmt: &'a Statement, out: &mut Vec<&'a Statement>) {
    match stmt {
        Statement::Block(stmts) => {
            for s in stmts {
                collect_declarations(s, out);
            }
        }
        Statement::Conditionally { conseq, alt, .. } => {
            collect_declarations(conseq, out);
            collect_declarations(alt, out);
        }
        s if s.is_declaration() => out.push(s),
        _ => {}
    }
}

impl Expression {
    /// Visits this expression and every sub-expression, pre-order.
    pub fn for_each_expr<F: FnMut(&Expression)>(&self, f: &mut F) {
        f(self);
        match self {
            Expression::SubField { expr, .. } | Expression::SubIndex { expr, .. } => {
                expr.for_each_expr(f)
            }
            Expression::SubAccess { expr, index, .. } => {
                expr.for_each_expr(f);
                index.for_each_expr(f);
            }
            Expression::Mux {
                cond, tval, fval, ..
            } => {
                cond.for_each_expr(f);
                tval.for_each_expr(f);
                fval.for_each_expr(f);
            }
            Expression::ValidIf { cond, value, .. } => {
                cond.for_each_expr(f);
                value.for_each_expr(f);
            }
            Expression::DoPrim { args, .. } => {
                for a in args {
                    a.for_each_expr(f);
                }
            }
            Expression::Reference { .. }
            | Expression::UIntLiteral { .. }
            | Expression::SIntLiteral { .. } => {}
        }
    }

    /// Rebuilds this expression with `f` applied to each immediate sub-expression.
    pub fn map_expr<F: FnMut(Expression) -> Expression>(self, f: &mut F) -> Expression {
        match self {
            Expression::SubField { expr, name, tpe } => Expression::SubField {
                expr: Box::new(f(*expr)),
                name,
                tpe,
            },
            Expression::SubIndex { expr, value, tpe } => Expression::SubIndex {
                expr: Box::new(f(*expr)),
                value,
                tpe,
            },
            Expression::SubAccess { expr, index, tpe } => Expression::SubAccess {
                expr: Box::new(f(*expr)),
                index: Box::new(f(*index)),
                tpe,
            },
            Expression::Mux {
                cond,
                tval,
                fval,
                tpe,
            } => Expression::Mux {
                cond: Box::new(f(*cond)),
                tval: Box::new(f(*tval)),
                fval: Box::new(f(*fval)),
                tpe,
            },
            Expression::ValidIf { cond, value, tpe } => Expression::ValidIf {
                cond: Box::new(f(*cond)),
                value: Box::new(f(*value)),
                tpe,
            },
            Expression::DoPrim {
                op,
                args,
                consts,
                tpe,
            } => Expression::DoPrim {
                op,
                args: args.into_iter().map(&mut *f).collect(),
                consts,
                tpe,
            },
            leaf => leaf,
        }
    }
}
