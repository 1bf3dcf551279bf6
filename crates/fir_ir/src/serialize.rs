//! Conversion of IR nodes to canonical text.
//!
//! Each entry point is a total match over its node's variants, and the
//! `Display` impls of the IR types delegate here. Nested statements indent by
//! two spaces per level. The output is what `fir_parser` reads back.

use crate::circuit::Circuit;
use crate::expr::Expression;
use crate::module::DefModule;
use crate::port::Port;
use crate::stmt::Statement;
use crate::types::{Field, Orientation, Type};
use crate::width::Width;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Serializes a width as `<n>`, or the empty string when unknown.
pub fn serialize_width(width: &Width) -> String {
    match width {
        Width::Known(n) => format!("<{n}>"),
        Width::Unknown => String::new(),
    }
}

/// Serializes a type.
pub fn serialize_type(tpe: &Type) -> String {
    match tpe {
        Type::UInt(w) => format!("UInt{}", serialize_width(w)),
        Type::SInt(w) => format!("SInt{}", serialize_width(w)),
        Type::Clock => "Clock".to_string(),
        Type::Bundle(fields) => {
            let fields: Vec<String> = fields.iter().map(serialize_field).collect();
            format!("{{{}}}", fields.join(", "))
        }
        Type::Vector { tpe, size } => format!("{}[{size}]", serialize_type(tpe)),
        Type::Unknown => "?".to_string(),
    }
}

fn serialize_field(field: &Field) -> String {
    let flip = match field.flip {
        Orientation::Default => "",
        Orientation::Flip => "flip ",
    };
    format!("{flip}{} : {}", field.name, serialize_type(&field.tpe))
}

/// Serializes an expression.
pub fn serialize_expression(expr: &Expression) -> String {
    match expr {
        Expression::Reference { name, .. } => name.clone(),
        Expression::SubField { expr, name, .. } => {
            format!("{}.{name}", serialize_expression(expr))
        }
        Expression::SubIndex { expr, value, .. } => {
            format!("{}[{value}]", serialize_expression(expr))
        }
        Expression::SubAccess { expr, index, .. } => format!(
            "{}[{}]",
            serialize_expression(expr),
            serialize_expression(index)
        ),
        Expression::Mux {
            cond, tval, fval, ..
        } => format!(
            "mux({}, {}, {})",
            serialize_expression(cond),
            serialize_expression(tval),
            serialize_expression(fval)
        ),
        Expression::ValidIf { cond, value, .. } => format!(
            "validif({}, {})",
            serialize_expression(cond),
            serialize_expression(value)
        ),
        Expression::UIntLiteral { value, width } => {
            format!("UInt{}({value})", serialize_width(width))
        }
        Expression::SIntLiteral { value, width } => {
            format!("SInt{}({value})", serialize_width(width))
        }
        Expression::DoPrim {
            op, args, consts, ..
        } => {
            let mut operands: Vec<String> = args.iter().map(serialize_expression).collect();
            operands.extend(consts.iter().map(|c| c.to_string()));
            format!("{op}({})", operands.join(", "))
        }
    }
}

/// Serializes a statement at indentation level zero.
pub fn serialize_statement(stmt: &Statement) -> String {
    let mut out = String::new();
    write_stmt(&mut out, stmt, 0);
    out
}

/// Serializes a module at indentation level zero.
pub fn serialize_module(module: &DefModule) -> String {
    let mut out = String::new();
    write_module(&mut out, module, 0);
    out
}

/// Serializes a whole circuit.
pub fn serialize_circuit(circuit: &Circuit) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "circuit {} :{}", circuit.main, circuit.info.suffix());
    for module in &circuit.modules {
        write_module(&mut out, module, 1);
    }
    out
}

/// Escapes a string for a quoted literal.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

fn pad(level: usize) -> String {
    INDENT.repeat(level)
}

fn write_module(out: &mut String, module: &DefModule, level: usize) {
    let keyword = if module.is_external() {
        "extmodule"
    } else {
        "module"
    };
    let _ = writeln!(
        out,
        "{}{keyword} {} :{}",
        pad(level),
        module.name(),
        module.info().suffix()
    );
    for port in module.ports() {
        write_port(out, port, level + 1);
    }
    if let Some(body) = module.body() {
        if !module.ports().is_empty() {
            out.push('\n');
        }
        write_body(out, body, level + 1);
    }
}

fn write_port(out: &mut String, port: &Port, level: usize) {
    let _ = writeln!(
        out,
        "{}{} {} : {}{}",
        pad(level),
        port.direction,
        port.name,
        serialize_type(&port.tpe),
        port.info.suffix()
    );
}

/// Writes a nested body. An empty body becomes `skip` so the enclosing
/// header is never left without an indented line.
fn write_body(out: &mut String, body: &Statement, level: usize) {
    if body.is_empty() {
        let _ = writeln!(out, "{}skip", pad(level));
    } else {
        write_stmt(out, body, level);
    }
}

fn write_stmt(out: &mut String, stmt: &Statement, level: usize) {
    let p = pad(level);
    match stmt {
        Statement::DefWire { info, name, tpe } => {
            let _ = writeln!(out, "{p}wire {name} : {}{}", serialize_type(tpe), info.suffix());
        }
        Statement::DefRegister {
            info,
            name,
            tpe,
            clock,
            reset,
            init,
        } => {
            let _ = writeln!(
                out,
                "{p}reg {name} : {}, {} with : (reset => ({}, {})){}",
                serialize_type(tpe),
                serialize_expression(clock),
                serialize_expression(reset),
                serialize_expression(init),
                info.suffix()
            );
        }
        Statement::DefInstance { info, name, module } => {
            let _ = writeln!(out, "{p}inst {name} of {module}{}", info.suffix());
        }
        Statement::DefMemory {
            info,
            name,
            data_type,
            depth,
            write_latency,
            read_latency,
            readers,
            writers,
            readwriters,
        } => {
            let _ = writeln!(out, "{p}mem {name} :{}", info.suffix());
            let q = pad(level + 1);
            let _ = writeln!(out, "{q}data-type => {}", serialize_type(data_type));
            let _ = writeln!(out, "{q}depth => {depth}");
            let _ = writeln!(out, "{q}read-latency => {read_latency}");
            let _ = writeln!(out, "{q}write-latency => {write_latency}");
            for r in readers {
                let _ = writeln!(out, "{q}reader => {r}");
            }
            for w in writers {
                let _ = writeln!(out, "{q}writer => {w}");
            }
            for rw in readwriters {
                let _ = writeln!(out, "{q}readwriter => {rw}");
            }
        }
        Statement::DefNode { info, name, value } => {
            let _ = writeln!(
                out,
                "{p}node {name} = {}{}",
                serialize_expression(value),
                info.suffix()
            );
        }
        Statement::Conditionally { .. } => write_when(out, stmt, level, ""),
        Statement::Block(stmts) => {
            for s in stmts {
                write_stmt(out, s, level);
            }
        }
        Statement::PartialConnect { info, loc, expr } => {
            let _ = writeln!(
                out,
                "{p}{} <- {}{}",
                serialize_expression(loc),
                serialize_expression(expr),
                info.suffix()
            );
        }
        Statement::Connect { info, loc, expr } => {
            let _ = writeln!(
                out,
                "{p}{} <= {}{}",
                serialize_expression(loc),
                serialize_expression(expr),
                info.suffix()
            );
        }
        Statement::IsInvalid { info, expr } => {
            let _ = writeln!(
                out,
                "{p}{} is invalid{}",
                serialize_expression(expr),
                info.suffix()
            );
        }
        Statement::Stop { info, ret, clk, en } => {
            let _ = writeln!(
                out,
                "{p}stop({}, {}, {ret}){}",
                serialize_expression(clk),
                serialize_expression(en),
                info.suffix()
            );
        }
        Statement::Print {
            info,
            string,
            args,
            clk,
            en,
        } => {
            let mut operands = vec![
                serialize_expression(clk),
                serialize_expression(en),
                format!("\"{}\"", escape_string(string)),
            ];
            operands.extend(args.iter().map(serialize_expression));
            let _ = writeln!(out, "{p}printf({}){}", operands.join(", "), info.suffix());
        }
        Statement::Empty => {
            let _ = writeln!(out, "{p}skip");
        }
    }
}

/// Writes a conditional, chaining `else when` for nested alternatives.
fn write_when(out: &mut String, stmt: &Statement, level: usize, prefix: &str) {
    let Statement::Conditionally {
        info,
        pred,
        conseq,
        alt,
    } = stmt
    else {
        return;
    };
    let p = pad(level);
    let _ = writeln!(
        out,
        "{p}{prefix}when {} :{}",
        serialize_expression(pred),
        info.suffix()
    );
    write_body(out, conseq, level + 1);
    match alt.as_ref() {
        Statement::Conditionally { .. } => write_when(out, alt, level, "else "),
        alt if alt.is_empty() => {}
        alt => {
            let _ = writeln!(out, "{p}else :");
            write_body(out, alt, level + 1);
        }
    }
}
